//! Metadata Resolver - turn a free-text title into a `MovieRecord`
//!
//! ## Algorithm
//! 1. Search the metadata service by title and take the first hit
//! 2. No hit: `Ok(None)`, nothing is raised
//! 3. Build the base record (title, overview, poster, rating) from the hit
//! 4. Fetch details (credits + videos) and streaming offers concurrently
//! 5. Overlay enrichment; a failed detail lookup leaves placeholders
//!
//! Only a failure of the base search is returned as an error. The engine
//! treats that as "no record" for the title.

use crate::tmdb::TmdbClient;
use crate::types::{MovieDetails, MovieLookup};
use async_trait::async_trait;
use domain::{
    MovieRecord, Result, StreamingOffer, TmdbSettings, CAST_NOT_AVAILABLE, UNKNOWN_DIRECTOR,
};
use tracing::{debug, instrument, warn};

const MAX_CAST: usize = 3;

/// Anything that can resolve a title to at most one movie.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>>;
}

/// Resolver backed by a `MovieLookup` implementation
pub struct MetadataResolver<L> {
    lookup: L,
}

impl MetadataResolver<TmdbClient> {
    /// Resolver talking to TMDB with the given settings
    pub fn from_settings(settings: &TmdbSettings) -> Result<Self> {
        Ok(Self::new(TmdbClient::new(settings.clone())?))
    }
}

impl<L: MovieLookup> MetadataResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Fetch details and streaming offers for `id` and apply them to `record`.
    ///
    /// Never fails: enrichment errors are logged and leave placeholders.
    async fn enrich(&self, record: &mut MovieRecord, id: u64) {
        let (details, offers) = tokio::join!(
            self.lookup.details(id),
            self.lookup.watch_providers(id)
        );

        let details = match details {
            Ok(details) => details,
            Err(e) => {
                warn!("Detail lookup failed for {} ({}): {}", record.title, id, e);
                return;
            }
        };

        let streaming = offers.unwrap_or_else(|e| {
            warn!("Streaming lookup failed for {} ({}): {}", record.title, id, e);
            Vec::new()
        });

        apply_details(record, id, details, streaming);
    }
}

/// Overlay a successful detail lookup onto the base record
fn apply_details(
    record: &mut MovieRecord,
    id: u64,
    details: MovieDetails,
    streaming: Vec<StreamingOffer>,
) {
    let credits = details.credits.unwrap_or_default();

    record.director = credits
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone())
        .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string());

    let cast: Vec<String> = credits
        .cast
        .into_iter()
        .take(MAX_CAST)
        .map(|member| member.name)
        .collect();
    record.cast = if cast.is_empty() {
        vec![CAST_NOT_AVAILABLE.to_string()]
    } else {
        cast
    };

    record.trailer_link = details
        .videos
        .unwrap_or_default()
        .results
        .into_iter()
        .find(|video| video.kind == "Trailer")
        .map(|video| format!("https://www.youtube.com/watch?v={}", video.key))
        .unwrap_or_else(|| format!("https://www.themoviedb.org/movie/{}", id));

    if !details.genres.is_empty() {
        record.genres = Some(details.genres.into_iter().map(|genre| genre.name).collect());
    }
    if details.runtime.is_some_and(|minutes| minutes > 0) {
        record.runtime = details.runtime;
    }
    if let Some(count) = details.vote_count {
        record.vote_count = count;
    }
    record.streaming = streaming;
}

#[async_trait]
impl<L: MovieLookup> TitleResolver for MetadataResolver<L> {
    #[instrument(skip(self))]
    async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>> {
        let query = title.trim();
        if query.is_empty() {
            debug!("Skipping blank title");
            return Ok(None);
        }

        let hits = self.lookup.search_by_title(query).await?;
        let Some(hit) = hits.into_iter().next() else {
            debug!("No results found for {:?}", query);
            return Ok(None);
        };

        let id = hit.id;
        let mut record = hit.into_base_record();
        self.enrich(&mut record, id).await;

        debug!("Resolved {:?} to {} ({})", query, record.title, record.id);
        Ok(Some(record))
    }
}
