//! Lookup-side types for the metadata service.
//!
//! These mirror the subset of TMDB's JSON that the resolver reads. Every
//! field that TMDB may omit or send as `null` is optional or defaulted, so a
//! sparse upstream record still deserializes.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{genre_names, MovieRecord, Result, StreamingOffer, NO_OVERVIEW};
use serde::Deserialize;

/// Raw read operations against the metadata service.
///
/// `MetadataResolver` is written against this trait so it can be tested
/// without a network.
#[async_trait]
pub trait MovieLookup: Send + Sync {
    /// Search movies by free-text title (first page only)
    async fn search_by_title(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Details with credits and videos appended
    async fn details(&self, id: u64) -> Result<MovieDetails>;

    /// Flat-rate streaming offers in the configured region
    async fn watch_providers(&self, id: u64) -> Result<Vec<StreamingOffer>>;
}

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One candidate from a title search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    /// "YYYY-MM-DD", or an empty string for unreleased titles
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl SearchHit {
    /// Build the base record with every required field defaulted.
    ///
    /// Enrichment fields start as placeholders and are overwritten by the
    /// resolver when the detail lookup succeeds.
    pub fn into_base_record(self) -> MovieRecord {
        let overview = self
            .overview
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_OVERVIEW.to_string());

        MovieRecord {
            id: self.id.to_string(),
            title: self.title,
            overview,
            poster_path: self.poster_path.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0).clamp(0.0, 10.0),
            vote_count: self.vote_count.unwrap_or(0),
            release_date: self.release_date.as_deref().and_then(parse_release_date),
            runtime: None,
            genres: genre_names(&self.genre_ids),
            director: domain::UNKNOWN_DIRECTOR.to_string(),
            cast: vec![domain::CAST_NOT_AVAILABLE.to_string()],
            trailer_link: domain::NO_TRAILER.to_string(),
            streaming: Vec::new(),
        }
    }
}

pub(crate) fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

// =============================================================================
// Details
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub genres: Vec<GenreRef>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub videos: Option<Videos>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

// =============================================================================
// Watch providers
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProvidersResponse {
    #[serde(default)]
    pub results: std::collections::HashMap<String, RegionProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionProviders {
    #[serde(default)]
    pub flatrate: Vec<Provider>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl WatchProvidersResponse {
    /// Flat-rate offers for `region`, empty when the region is absent
    pub fn offers_for(self, region: &str) -> Vec<StreamingOffer> {
        let mut results = self.results;
        results
            .remove(region)
            .map(|providers| {
                providers
                    .flatrate
                    .into_iter()
                    .map(|p| StreamingOffer {
                        provider_name: p.provider_name,
                        logo_path: p.logo_path.unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
