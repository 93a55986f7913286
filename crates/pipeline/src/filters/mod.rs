//! Filter implementations for the record pipeline.
//!
//! This module contains the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod genre_match;

// Re-export for convenience
pub use genre_match::GenreMatchFilter;
