//! HTTP client for the TMDB v3 REST API.

use crate::types::{MovieDetails, MovieLookup, SearchHit, SearchResponse, WatchProvidersResponse};
use async_trait::async_trait;
use domain::{Error, Result, StreamingOffer, TmdbSettings};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

const SERVICE: &str = "tmdb";

/// Thin request/response wrapper over the three endpoints the resolver needs.
///
/// The API key travels as the `api_key` query parameter and is never logged.
pub struct TmdbClient {
    client: Client,
    settings: TmdbSettings,
    base_url: String,
}

impl TmdbClient {
    /// Build a client from settings.
    ///
    /// Fails with `Error::Configuration` when the API key is blank.
    pub fn new(settings: TmdbSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(Error::configuration(domain::config::TMDB_API_KEY));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::upstream(SERVICE, format!("building HTTP client: {}", e)))?;

        let base_url = settings.base_url.trim_end_matches('/').to_string();
        info!(
            "Using metadata service at {} (language: {}, region: {})",
            base_url, settings.language, settings.region
        );

        Ok(Self {
            client,
            settings,
            base_url,
        })
    }

    /// GET `path` with the API key plus `params`, decoding JSON on success.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", path);

        let mut query: Vec<(&str, &str)> = vec![("api_key", self.settings.api_key.as_str())];
        query.extend_from_slice(params);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                // reqwest errors embed the full URL, which carries the key
                error!("Request to {} failed: {}", path, e.without_url());
                Error::upstream(SERVICE, format!("{} unreachable", path))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Request to {} failed with status {}", path, status);
            return Err(Error::upstream(SERVICE, format!("status {} for {}", status, path)));
        }

        response.json::<T>().await.map_err(|e| {
            Error::upstream(
                SERVICE,
                format!("invalid body for {}: {}", path, e.without_url()),
            )
        })
    }
}

#[async_trait]
impl MovieLookup for TmdbClient {
    async fn search_by_title(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response: SearchResponse = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query),
                    ("language", self.settings.language.as_str()),
                    ("page", "1"),
                    ("include_adult", "false"),
                ],
            )
            .await?;
        debug!("Search for {:?} returned {} results", query, response.results.len());
        Ok(response.results)
    }

    async fn details(&self, id: u64) -> Result<MovieDetails> {
        self.get_json(
            &format!("/movie/{}", id),
            &[
                ("language", self.settings.language.as_str()),
                ("append_to_response", "credits,videos"),
            ],
        )
        .await
    }

    async fn watch_providers(&self, id: u64) -> Result<Vec<StreamingOffer>> {
        let response: WatchProvidersResponse = self
            .get_json(&format!("/movie/{}/watch/providers", id), &[])
            .await?;
        Ok(response.offers_for(&self.settings.region))
    }
}
