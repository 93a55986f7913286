//! # Domain Crate
//!
//! Shared types for the conversational movie recommender.
//!
//! ## Main Components
//!
//! - **types**: MovieRecord, StreamingOffer, ChatMessage, Role, GenreFilter
//! - **genres**: the metadata service's fixed genre id table
//! - **config**: Settings loaded from the environment
//! - **error**: the error taxonomy used by every crate
//!
//! ## Example Usage
//!
//! ```ignore
//! use domain::{GenreFilter, Settings};
//!
//! let settings = Settings::from_env()?;
//! let filter = GenreFilter::new(["Comedy", "romance"]);
//! assert!(filter.contains("comedy"));
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod genres;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{OpenAiSettings, Settings, TmdbSettings};
pub use error::{Error, Result};
pub use genres::{genre_name, genre_names, MOVIE_GENRES};
pub use types::{
    // Conversation
    ChatMessage,
    Role,
    // Movies
    GenreFilter,
    MovieRecord,
    StreamingOffer,
    // Placeholders
    CAST_NOT_AVAILABLE,
    NO_OVERVIEW,
    NO_TRAILER,
    UNKNOWN_DIRECTOR,
};
