//! # Metadata Crate
//!
//! Resolves free-text movie titles into enriched `MovieRecord`s.
//!
//! ## Components
//!
//! ### MovieLookup / TmdbClient
//! Raw read operations against the metadata service:
//! - title search (first page only)
//! - details with credits and videos
//! - flat-rate streaming offers for one region
//!
//! ### MetadataResolver
//! Best-effort resolution of one title:
//! - first search hit wins
//! - detail and streaming failures degrade to placeholders
//! - only a failed search is reported as an error
//!
//! ## Example Usage
//!
//! ```ignore
//! use domain::Settings;
//! use metadata::{MetadataResolver, TitleResolver};
//!
//! let settings = Settings::from_env()?;
//! let resolver = MetadataResolver::from_settings(&settings.tmdb)?;
//!
//! if let Some(movie) = resolver.resolve("The Matrix").await? {
//!     println!("{} directed by {}", movie.title, movie.director);
//! }
//! ```

// Public modules
pub mod resolver;
pub mod tmdb;
pub mod types;

// Re-export commonly used types
pub use resolver::{MetadataResolver, TitleResolver};
pub use tmdb::TmdbClient;
pub use types::{MovieDetails, MovieLookup, SearchHit};
