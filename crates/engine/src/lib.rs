//! Engine crate for the Reel Chat recommendation assistant.
//!
//! This crate contains the orchestrator that coordinates the generative
//! service, title resolution and genre filtering for one request, and the
//! transcript it writes to.

pub mod orchestrator;
pub mod transcript;

pub use orchestrator::{
    PipelineError, Recommendation, RecommendationEngine, Stage, FALLBACK_MESSAGE,
};
pub use transcript::{Transcript, GREETING};
