//! Client for the generative-text service.
//!
//! This crate provides the `CompletionService` trait the engine talks to and
//! an implementation for OpenAI-compatible chat completion APIs. It handles:
//! - Building the HTTP client with the configured timeout
//! - Wrapping a prompt into a single-message chat request
//! - Mapping transport errors and non-success statuses to `Error::Upstream`

use async_trait::async_trait;
use domain::{Error, OpenAiSettings, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

const SERVICE: &str = "openai";

/// A request/response text generation backend.
///
/// One prompt in, one complete text response out. No streaming.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize, Debug)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    content: Option<String>,
}

// =============================================================================
// OpenAI-compatible client
// =============================================================================

/// Client for `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: Client,
    settings: OpenAiSettings,
    endpoint: String,
}

impl OpenAiClient {
    /// Build a client from settings.
    ///
    /// Fails with `Error::Configuration` if the API key is blank, before any
    /// request is attempted.
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(Error::configuration(domain::config::OPENAI_API_KEY));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::upstream(SERVICE, format!("building HTTP client: {}", e)))?;

        let endpoint = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));
        info!("Using completion endpoint {} (model: {})", endpoint, settings.model);

        Ok(Self {
            client,
            settings,
            endpoint,
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Sending completion request ({} chars)", prompt.len());

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatRequestMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Completion request failed to send: {}", e);
                Error::upstream(SERVICE, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            error!("Completion request failed with status {}: {}", status, body);
            return Err(Error::upstream(SERVICE, format!("status {}", status)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("invalid response body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::upstream(SERVICE, "response contained no message content"))?;

        debug!("Received completion ({} chars)", content.len());
        Ok(content)
    }
}
