//! Runtime configuration read from the environment.
//!
//! Both API credentials are required. They are checked when `Settings` is
//! built, so a missing key is reported before any client sends a request.

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::debug;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const TMDB_API_KEY: &str = "TMDB_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const TMDB_BASE_URL: &str = "TMDB_BASE_URL";
pub const TMDB_LANGUAGE: &str = "TMDB_LANGUAGE";
pub const TMDB_REGION: &str = "TMDB_REGION";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_TMDB_LANGUAGE: &str = "en-US";
const DEFAULT_TMDB_REGION: &str = "US";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the generative-text service
#[derive(Clone, Debug)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Settings for the movie metadata service
#[derive(Clone, Debug)]
pub struct TmdbSettings {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    /// Country code used to pick streaming offers
    pub region: String,
    pub timeout: Duration,
}

/// Complete application configuration
#[derive(Clone, Debug)]
pub struct Settings {
    pub openai: OpenAiSettings,
    pub tmdb: TmdbSettings,
}

/// Trimmed value of a variable; blank counts as unset
fn read<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn require<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    read(lookup, name).ok_or_else(|| Error::configuration(name))
}

fn read_or<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    read(lookup, name).unwrap_or_else(|| default.to_string())
}

fn request_timeout<F>(lookup: &F) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = read(lookup, REQUEST_TIMEOUT_SECS) else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::InvalidSetting {
            name: REQUEST_TIMEOUT_SECS.to_string(),
            value: raw,
        }),
    }
}

impl OpenAiSettings {
    /// Load the generative-service settings through a lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: require(&lookup, OPENAI_API_KEY)?,
            model: read_or(&lookup, OPENAI_MODEL, DEFAULT_OPENAI_MODEL),
            base_url: read_or(&lookup, OPENAI_BASE_URL, DEFAULT_OPENAI_BASE_URL),
            max_tokens: 2048,
            timeout: request_timeout(&lookup)?,
        })
    }
}

impl TmdbSettings {
    /// Load only the metadata-service settings from the environment.
    ///
    /// Lookups that never reach the generative service use this, so they
    /// don't need `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: require(&lookup, TMDB_API_KEY)?,
            base_url: read_or(&lookup, TMDB_BASE_URL, DEFAULT_TMDB_BASE_URL),
            language: read_or(&lookup, TMDB_LANGUAGE, DEFAULT_TMDB_LANGUAGE),
            region: read_or(&lookup, TMDB_REGION, DEFAULT_TMDB_REGION),
            timeout: request_timeout(&lookup)?,
        })
    }
}

impl Settings {
    /// Load settings from process environment variables.
    ///
    /// The binary loads `.env` (via dotenvy) before calling this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary lookup function.
    ///
    /// Credentials that are missing or blank produce
    /// `Error::Configuration` naming the variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = Self {
            openai: OpenAiSettings::from_lookup(&lookup)?,
            tmdb: TmdbSettings::from_lookup(&lookup)?,
        };

        debug!(
            "Loaded settings (model: {}, tmdb: {}, timeout: {:?})",
            settings.openai.model, settings.tmdb.base_url, settings.openai.timeout
        );
        Ok(settings)
    }
}
