//! Benchmarks for the CPU-side pipeline stages
//!
//! Run with: cargo bench --package pipeline
//!
//! Measures title parsing and genre filtering on a full-size response
//! (25 titles), the work done between the two network-bound phases.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use domain::{GenreFilter, MovieRecord, CAST_NOT_AVAILABLE, NO_TRAILER, UNKNOWN_DIRECTOR};
use pipeline::filters::GenreMatchFilter;
use pipeline::{parse_titles, FilterPipeline, TARGET_SUGGESTIONS};

const GENRES: &[&str] = &["Action", "Comedy", "Drama", "Horror", "Romance", "Thriller"];

fn sample_response() -> String {
    let titles: Vec<String> = (0..TARGET_SUGGESTIONS)
        .map(|i| format!("Movie number {}", i))
        .collect();
    serde_json::to_string(&titles).unwrap()
}

fn sample_records() -> Vec<MovieRecord> {
    (0..TARGET_SUGGESTIONS)
        .map(|i| MovieRecord {
            id: i.to_string(),
            title: format!("Movie number {}", i),
            overview: "An overview".to_string(),
            poster_path: String::new(),
            vote_average: 7.0,
            vote_count: 100,
            release_date: None,
            runtime: Some(100),
            genres: Some(vec![
                GENRES[i % GENRES.len()].to_string(),
                GENRES[(i + 1) % GENRES.len()].to_string(),
            ]),
            director: UNKNOWN_DIRECTOR.to_string(),
            cast: vec![CAST_NOT_AVAILABLE.to_string()],
            trailer_link: NO_TRAILER.to_string(),
            streaming: Vec::new(),
        })
        .collect()
}

fn bench_parse_titles(c: &mut Criterion) {
    let response = sample_response();

    c.bench_function("parse_titles_25", |b| {
        b.iter(|| {
            let titles = parse_titles(black_box(&response)).unwrap();
            black_box(titles)
        })
    });
}

fn bench_genre_filter(c: &mut Criterion) {
    let pipeline = FilterPipeline::new().add_filter(GenreMatchFilter);
    let genres = GenreFilter::new(["comedy", "horror"]);
    let records = sample_records();

    c.bench_function("genre_filter_25", |b| {
        b.iter(|| {
            let kept = pipeline.apply(black_box(records.clone()), &genres).unwrap();
            black_box(kept)
        })
    });
}

criterion_group!(benches, bench_parse_titles, bench_genre_filter);
criterion_main!(benches);
