//! Error types shared by every crate in the workspace.
//!
//! The recommendation pipeline distinguishes three failure families:
//! - missing configuration, detected before any request is sent
//! - upstream failures from the completion or metadata services
//! - generative output that does not have the expected shape

use thiserror::Error;

/// Errors that can occur anywhere in the recommendation pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting (usually an API credential) is missing or empty
    #[error("Missing configuration: {name} is not set")]
    Configuration { name: String },

    /// A setting is present but cannot be used
    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: String, value: String },

    /// Network or service failure while talking to an external API
    ///
    /// `service` names the collaborator ("openai", "tmdb") so log lines and
    /// user-facing errors can say which side failed.
    #[error("{service} request failed: {reason}")]
    Upstream { service: String, reason: String },

    /// The generative response could not be read as a list of titles
    #[error("Failed to parse movie titles: {0}")]
    Parse(String),
}

impl Error {
    pub fn configuration(name: impl Into<String>) -> Self {
        Self::Configuration { name: name.into() }
    }

    pub fn upstream(service: impl Into<String>, reason: impl ToString) -> Self {
        Self::Upstream {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that mean the process is misconfigured rather than
    /// that a single request went wrong.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::InvalidSetting { .. })
    }
}

/// Convenience type alias for Results in this workspace
pub type Result<T> = std::result::Result<T, Error>;
