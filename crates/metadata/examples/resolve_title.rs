//! Example: Resolve a single title against the live metadata service
//!
//! Run with: cargo run --package metadata --example resolve_title -- "The Matrix"
//!
//! Requires TMDB_API_KEY in the environment or a `.env` file.

use domain::TmdbSettings;
use metadata::{MetadataResolver, TitleResolver};
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info,metadata=debug").init();
    dotenvy::dotenv().ok();

    let title = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "The Shawshank Redemption".to_string());

    let settings = TmdbSettings::from_env()?;
    let resolver = MetadataResolver::from_settings(&settings)?;

    println!("=== Resolving {:?} ===\n", title);
    let start = Instant::now();
    let movie = resolver.resolve(&title).await?;
    println!("Resolved in {:?}\n", start.elapsed());

    match movie {
        Some(movie) => {
            println!("{} ({})", movie.title, movie.id);
            println!("  Released: {:?}", movie.release_date);
            println!("  Rating: {:.1} ({} votes)", movie.vote_average, movie.vote_count);
            println!("  Genres: {}", movie.genre_tags().join(", "));
            println!("  Director: {}", movie.director);
            println!("  Cast: {}", movie.cast.join(", "));
            println!("  Trailer: {}", movie.trailer_link);
            for offer in &movie.streaming {
                println!(
                    "  Streaming on {} {}",
                    offer.provider_name,
                    offer.logo_url().unwrap_or_default()
                );
            }
        }
        None => println!("No match found"),
    }

    Ok(())
}
