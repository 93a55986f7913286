//! Pipeline stages between the generative service and the caller.
//!
//! This crate provides:
//! - Prompt construction for the title and explanation requests
//! - Strict parsing of the generated title list
//! - Filter trait and implementations for resolved records
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! A request flows through these stages:
//! 1. `recommendation_prompt` builds the title request
//! 2. `parse_titles` validates the response as a JSON array of strings
//! 3. (titles are resolved to records elsewhere)
//! 4. FilterPipeline drops records outside the caller's genre selection
//! 5. `explanation_prompt` builds the rationale request
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, parse_titles, recommendation_prompt};
//! use pipeline::filters::GenreMatchFilter;
//!
//! let prompt = recommendation_prompt("something cozy", &genres);
//! let titles = parse_titles(&response)?;
//!
//! let pipeline = FilterPipeline::new().add_filter(GenreMatchFilter);
//! let kept = pipeline.apply(records, &genres)?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod prompts;
pub mod titles;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use prompts::{explanation_prompt, recommendation_prompt, TARGET_SUGGESTIONS};
pub use titles::parse_titles;
pub use traits::Filter;
