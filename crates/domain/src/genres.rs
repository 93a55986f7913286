//! The fixed movie genre table of the metadata service.
//!
//! Search results only carry numeric genre ids, so records built from a
//! search summary use this table to get genre names before (or without)
//! the detail lookup.

/// (id, name) pairs as published by TMDB
pub const MOVIE_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Look up the display name of a genre id
pub fn genre_name(id: u32) -> Option<&'static str> {
    MOVIE_GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Map genre ids to names, skipping unknown ids.
///
/// Returns `None` when nothing could be mapped, so the record counts as
/// untagged.
pub fn genre_names(ids: &[u32]) -> Option<Vec<String>> {
    let names: Vec<String> = ids
        .iter()
        .filter_map(|id| genre_name(*id))
        .map(str::to_string)
        .collect();
    if names.is_empty() { None } else { Some(names) }
}
