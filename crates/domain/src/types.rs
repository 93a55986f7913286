//! Core domain types for the recommendation pipeline.
//!
//! This module defines the data structures every other crate passes around:
//! - `MovieRecord`: a resolved, enriched movie
//! - `ChatMessage` / `Role`: one entry of a conversation transcript
//! - `GenreFilter`: the caller's genre selection

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

// =============================================================================
// Placeholders
// =============================================================================
// Values used when the upstream record lacks a field or enrichment failed.

pub const NO_OVERVIEW: &str = "No overview available";
pub const UNKNOWN_DIRECTOR: &str = "Unknown Director";
pub const CAST_NOT_AVAILABLE: &str = "Cast not available";
pub const NO_TRAILER: &str = "#";

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const LOGO_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

// =============================================================================
// Movie-related Types
// =============================================================================

/// A streaming offer for a movie (flat-rate subscription providers only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingOffer {
    pub provider_name: String,
    pub logo_path: String,
}

impl StreamingOffer {
    /// Full URL of the provider logo, if the upstream gave a path
    pub fn logo_url(&self) -> Option<String> {
        image_url(LOGO_BASE_URL, &self.logo_path)
    }
}

/// A movie resolved from a free-text title.
///
/// The base fields (`title`, `overview`, `poster_path`, `vote_average`) are
/// always populated, falling back to defaults when the metadata service
/// lacks them. The enrichment fields (`director`, `cast`, `trailer_link`,
/// `streaming`) hold placeholder values when the detail lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Identifier from the metadata service, kept as a string
    pub id: String,
    pub title: String,
    pub overview: String,
    /// Relative poster path, empty when the movie has no poster
    pub poster_path: String,
    /// Average rating from 0.0 to 10.0
    pub vote_average: f32,
    pub vote_count: u32,
    pub release_date: Option<NaiveDate>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    /// Genre names in upstream order; `None` when the movie is untagged
    pub genres: Option<Vec<String>>,
    pub director: String,
    /// Up to three leading cast members
    pub cast: Vec<String>,
    pub trailer_link: String,
    pub streaming: Vec<StreamingOffer>,
}

impl MovieRecord {
    /// Full poster URL, or `None` when there is no poster
    pub fn poster_url(&self) -> Option<String> {
        image_url(POSTER_BASE_URL, &self.poster_path)
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }

    /// Runtime rendered as "2h 15m" (or "45m" for short films)
    pub fn formatted_runtime(&self) -> Option<String> {
        self.runtime.map(|minutes| {
            let hours = minutes / 60;
            let rest = minutes % 60;
            if hours > 0 {
                format!("{}h {}m", hours, rest)
            } else {
                format!("{}m", rest)
            }
        })
    }

    /// Genre tags as a slice, empty when the record is untagged
    pub fn genre_tags(&self) -> &[String] {
        self.genres.as_deref().unwrap_or(&[])
    }
}

fn image_url(base: &str, path: &str) -> Option<String> {
    if path.is_empty() {
        None
    } else {
        Some(format!("{}{}", base, path))
    }
}

// =============================================================================
// Conversation Types
// =============================================================================

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of a conversation transcript.
///
/// Messages are immutable once created: fields are private and only
/// exposed through getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: Uuid,
    content: String,
    role: Role,
    timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message with a fresh id and the current time
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Markdown-formatted body
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

// =============================================================================
// Genre Filter
// =============================================================================

/// A set of lower-cased genre names selected by the caller.
///
/// An empty filter means "no filtering". Entries are kept sorted so prompts
/// built from the filter are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreFilter {
    genres: BTreeSet<String>,
}

impl GenreFilter {
    /// Build a filter from arbitrary genre names.
    ///
    /// Names are trimmed and lower-cased; blank entries are ignored.
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let genres = genres
            .into_iter()
            .map(|genre| genre.as_ref().trim().to_lowercase())
            .filter(|genre| !genre.is_empty())
            .collect();
        Self { genres }
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.genres.contains(&genre.to_lowercase())
    }

    /// True if any of `tags` matches an entry, ignoring case
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|tag| self.contains(tag.as_ref()))
    }

    /// Whether `record` survives this filter.
    ///
    /// Untagged records are only kept when the filter is empty.
    pub fn keeps(&self, record: &MovieRecord) -> bool {
        if self.is_empty() {
            return true;
        }
        match &record.genres {
            Some(tags) => self.matches(tags),
            None => false,
        }
    }

    /// Entries joined with `separator`, e.g. "comedy and drama"
    pub fn join(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }
}
