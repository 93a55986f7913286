//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Record the user's message
//! 2. Ask the generative service for a list of titles
//! 3. Parse the list strictly
//! 4. Resolve every title concurrently (failures are isolated per title)
//! 5. Filter the records by the caller's genre selection
//! 6. Ask the generative service to explain the picks
//! 7. Record the explanation and return the records
//!
//! Any failure in steps 2, 3 or 6 ends the request with a single fallback
//! message and an empty result.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use domain::{ChatMessage, Error, GenreFilter, MovieRecord, Settings};
use llm_client::{CompletionService, OpenAiClient};
use metadata::{MetadataResolver, TitleResolver};
use pipeline::filters::GenreMatchFilter;
use pipeline::{explanation_prompt, parse_titles, recommendation_prompt, FilterPipeline};

use crate::transcript::Transcript;

/// Reply appended to the transcript when a request fails
pub const FALLBACK_MESSAGE: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";

/// Steps of a single recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Prompting,
    AwaitingTitles,
    Resolving,
    Filtering,
    Explaining,
    Done,
    Errored,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Prompting => "prompting",
            Stage::AwaitingTitles => "awaiting titles",
            Stage::Resolving => "resolving",
            Stage::Filtering => "filtering",
            Stage::Explaining => "explaining",
            Stage::Done => "done",
            Stage::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// A fatal failure, tagged with the stage it happened in
#[derive(Debug, Error)]
#[error("recommendation failed while {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(Error) -> Self {
        move |source| Self { stage, source }
    }
}

/// Everything a successful request produced
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Titles exactly as the generative service suggested them
    pub titles: Vec<String>,
    /// Resolved records that survived the genre filter, in title order
    pub movies: Vec<MovieRecord>,
    /// Raw rationale text (markdown)
    pub explanation: String,
}

/// Main orchestrator for recommendation requests
#[derive(Clone)]
pub struct RecommendationEngine {
    completion: Arc<dyn CompletionService>,
    resolver: Arc<dyn TitleResolver>,
    filter_pipeline: Arc<FilterPipeline>,
}

impl RecommendationEngine {
    /// Create an engine from its two collaborators
    pub fn new(completion: Arc<dyn CompletionService>, resolver: Arc<dyn TitleResolver>) -> Self {
        let filter_pipeline = Arc::new(FilterPipeline::new().add_filter(GenreMatchFilter));
        Self {
            completion,
            resolver,
            filter_pipeline,
        }
    }

    /// Create an engine backed by the OpenAI and TMDB clients
    pub fn from_settings(settings: &Settings) -> domain::Result<Self> {
        let completion = OpenAiClient::new(settings.openai.clone())?;
        let resolver = MetadataResolver::from_settings(&settings.tmdb)?;
        Ok(Self::new(Arc::new(completion), Arc::new(resolver)))
    }

    /// Main entry point: recommend movies for a free-text request.
    ///
    /// Blank input is ignored: nothing is sent and the transcript is left
    /// untouched. Otherwise the user's message is appended to `transcript`
    /// before any request is sent. Exactly one assistant message follows:
    /// the explanation on success, or the fixed fallback text on failure
    /// (in which case the result is empty).
    pub async fn recommend(
        &self,
        user_text: &str,
        genres: &GenreFilter,
        transcript: &mut Transcript,
    ) -> Vec<MovieRecord> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            debug!("Ignoring blank request");
            return Vec::new();
        }
        transcript.append(ChatMessage::user(user_text));

        match self.try_recommend(user_text, genres).await {
            Ok(recommendation) => {
                transcript.append(ChatMessage::assistant(recommendation.explanation));
                recommendation.movies
            }
            Err(e) => {
                error!("Error in movie recommendation: {}", e);
                info!("Request {}", Stage::Errored);
                transcript.append(ChatMessage::assistant(FALLBACK_MESSAGE));
                Vec::new()
            }
        }
    }

    /// Run the pipeline without touching a transcript.
    pub async fn try_recommend(
        &self,
        user_text: &str,
        genres: &GenreFilter,
    ) -> Result<Recommendation, PipelineError> {
        let start_time = Instant::now();
        transition(Stage::Idle, Stage::Prompting);

        // Ask for titles
        let prompt = recommendation_prompt(user_text, genres);
        info!("Requesting titles (genres: [{}])", genres.join(", "));
        let response = self
            .completion
            .complete(&prompt)
            .await
            .map_err(PipelineError::at(Stage::Prompting))?;
        transition(Stage::Prompting, Stage::AwaitingTitles);

        // Parse strictly
        let titles = parse_titles(&response).map_err(|e| {
            warn!("Failed to parse movie titles from response: {:?}", response);
            PipelineError::at(Stage::AwaitingTitles)(e)
        })?;
        info!("Parsed {} titles", titles.len());
        transition(Stage::AwaitingTitles, Stage::Resolving);

        // Resolve everything concurrently
        let resolved = self.resolve_titles(&titles).await;
        info!("Resolved {} of {} titles", resolved.len(), titles.len());
        transition(Stage::Resolving, Stage::Filtering);

        // Filter
        let movies = self
            .filter_pipeline
            .apply(resolved, genres)
            .map_err(PipelineError::at(Stage::Filtering))?;
        info!("Found movies: {}", movies.len());
        transition(Stage::Filtering, Stage::Explaining);

        // Explain the original suggestions
        let explanation = self
            .completion
            .complete(&explanation_prompt(&titles, genres, user_text))
            .await
            .map_err(PipelineError::at(Stage::Explaining))?;

        info!(
            "Request {} in {:.2?} ({} movies)",
            Stage::Done,
            start_time.elapsed(),
            movies.len()
        );

        Ok(Recommendation {
            titles,
            movies,
            explanation,
        })
    }

    /// Resolve every title at once and wait for all of them.
    ///
    /// A failed or empty lookup only drops that title. Output keeps title
    /// order.
    async fn resolve_titles(&self, titles: &[String]) -> Vec<MovieRecord> {
        debug!("Resolving {} titles concurrently", titles.len());

        let lookups = titles.iter().map(|title| async move {
            match self.resolver.resolve(title).await {
                Ok(Some(movie)) => Some(movie),
                Ok(None) => {
                    debug!("No match for {:?}", title);
                    None
                }
                Err(e) => {
                    warn!("Error fetching movie {:?}: {}", title, e);
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}

fn transition(from: Stage, to: Stage) {
    debug!("Request {} -> {}", from, to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::{Role, CAST_NOT_AVAILABLE, NO_OVERVIEW, NO_TRAILER, UNKNOWN_DIRECTOR};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Barrier;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Completion service that replays scripted replies and records prompts
    #[derive(Default)]
    struct ScriptedCompletion {
        replies: Mutex<VecDeque<domain::Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCompletion {
        fn new(replies: Vec<domain::Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(&self, prompt: &str) -> domain::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::upstream("openai", "no scripted reply left")))
        }
    }

    /// What the fake resolver does for a title
    #[derive(Clone)]
    enum Lookup {
        Found(Vec<&'static str>),
        Missing,
        Fails,
        /// Found after a delay, to reorder completions
        Slow(u64, Vec<&'static str>),
    }

    struct FakeResolver {
        catalog: HashMap<String, Lookup>,
        calls: Mutex<Vec<String>>,
        barrier: Option<Barrier>,
    }

    impl FakeResolver {
        fn new(entries: &[(&str, Lookup)]) -> Self {
            Self {
                catalog: entries
                    .iter()
                    .map(|(title, lookup)| (title.to_string(), lookup.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
                barrier: None,
            }
        }

        /// Every lookup waits until `n` lookups are in flight
        fn with_barrier(mut self, n: usize) -> Self {
            self.barrier = Some(Barrier::new(n));
            self
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    fn movie(title: &str, genres: &[&str]) -> MovieRecord {
        MovieRecord {
            id: format!("id-{}", title),
            title: title.to_string(),
            overview: NO_OVERVIEW.to_string(),
            poster_path: String::new(),
            vote_average: 7.0,
            vote_count: 42,
            release_date: None,
            runtime: None,
            genres: if genres.is_empty() {
                None
            } else {
                Some(genres.iter().map(|g| g.to_string()).collect())
            },
            director: UNKNOWN_DIRECTOR.to_string(),
            cast: vec![CAST_NOT_AVAILABLE.to_string()],
            trailer_link: NO_TRAILER.to_string(),
            streaming: Vec::new(),
        }
    }

    #[async_trait]
    impl TitleResolver for FakeResolver {
        async fn resolve(&self, title: &str) -> domain::Result<Option<MovieRecord>> {
            self.calls.lock().unwrap().push(title.to_string());
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            match self.catalog.get(title).cloned().unwrap_or(Lookup::Missing) {
                Lookup::Found(genres) => Ok(Some(movie(title, &genres))),
                Lookup::Missing => Ok(None),
                Lookup::Fails => Err(Error::upstream("tmdb", "connection reset")),
                Lookup::Slow(ms, genres) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(Some(movie(title, &genres)))
                }
            }
        }
    }

    fn engine(
        completion: Arc<ScriptedCompletion>,
        resolver: Arc<FakeResolver>,
    ) -> RecommendationEngine {
        RecommendationEngine::new(completion, resolver)
    }

    fn titles(titles: &[&str]) -> domain::Result<String> {
        Ok(serde_json::to_string(titles).unwrap())
    }

    fn assistant_messages(transcript: &Transcript) -> Vec<String> {
        transcript
            .iter()
            .filter(|m| m.role() == Role::Assistant)
            .map(|m| m.content().to_string())
            .collect()
    }

    // ============================================================================
    // Scenarios
    // ============================================================================

    #[tokio::test]
    async fn test_comedy_request_keeps_only_matching_genres() {
        let completion = ScriptedCompletion::new(vec![
            titles(&["Movie A", "Movie B"]),
            Ok("Here are my recommendations...".to_string()),
        ]);
        let resolver = Arc::new(FakeResolver::new(&[
            ("Movie A", Lookup::Found(vec!["Comedy", "Romance"])),
            ("Movie B", Lookup::Found(vec!["Drama"])),
        ]));
        let engine = engine(completion.clone(), resolver);
        let mut transcript = Transcript::new();

        let movies = engine
            .recommend(
                "I want a lighthearted comedy",
                &GenreFilter::new(["comedy"]),
                &mut transcript,
            )
            .await;

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Movie A");

        let messages = transcript.snapshot();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), Role::User);
        assert_eq!(messages[0].content(), "I want a lighthearted comedy");
        assert_eq!(messages[1].role(), Role::Assistant);
        assert_eq!(messages[1].content(), "Here are my recommendations...");

        // The explanation covers the suggested titles, not just the kept ones
        let prompts = completion.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Focus on comedy genres."));
        assert!(prompts[1].contains("Movie A, Movie B"));
    }

    #[tokio::test]
    async fn test_unparseable_titles_append_one_fallback() {
        let completion = ScriptedCompletion::new(vec![Ok("not json".to_string())]);
        let resolver = Arc::new(FakeResolver::new(&[]));
        let engine = engine(completion.clone(), resolver.clone());
        let mut transcript = Transcript::new();

        let movies = engine
            .recommend("anything", &GenreFilter::default(), &mut transcript)
            .await;

        assert!(movies.is_empty());
        assert_eq!(assistant_messages(&transcript), vec![FALLBACK_MESSAGE]);
        assert_eq!(transcript.len(), 2);
        assert_eq!(resolver.calls(), 0, "nothing should be resolved");
        assert_eq!(completion.prompts().len(), 1, "no explanation after a parse error");
    }

    #[tokio::test]
    async fn test_parse_error_reports_stage() {
        let completion = ScriptedCompletion::new(vec![Ok("{\"titles\": []}".to_string())]);
        let engine = engine(completion, Arc::new(FakeResolver::new(&[])));

        let err = engine
            .try_recommend("anything", &GenreFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::AwaitingTitles);
        assert!(matches!(err.source, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_per_title_failures_do_not_abort_batch() {
        let completion = ScriptedCompletion::new(vec![
            titles(&["Hit 1", "Broken", "Hit 2", "Unknown Title XYZ"]),
            Ok("explanation".to_string()),
        ]);
        let resolver = Arc::new(FakeResolver::new(&[
            ("Hit 1", Lookup::Found(vec!["Drama"])),
            ("Broken", Lookup::Fails),
            ("Hit 2", Lookup::Found(vec![])),
        ]));
        let engine = engine(completion, resolver.clone());
        let mut transcript = Transcript::new();

        let movies = engine
            .recommend("drama please", &GenreFilter::default(), &mut transcript)
            .await;

        let found: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(found, vec!["Hit 1", "Hit 2"]);
        assert_eq!(resolver.calls(), 4);
        assert_eq!(assistant_messages(&transcript), vec!["explanation"]);
    }

    #[tokio::test]
    async fn test_title_request_failure_falls_back() {
        let completion =
            ScriptedCompletion::new(vec![Err(Error::upstream("openai", "status 500"))]);
        let engine = engine(completion, Arc::new(FakeResolver::new(&[])));
        let mut transcript = Transcript::new();

        let movies = engine
            .recommend("anything", &GenreFilter::default(), &mut transcript)
            .await;

        assert!(movies.is_empty());
        assert_eq!(assistant_messages(&transcript), vec![FALLBACK_MESSAGE]);
    }

    #[tokio::test]
    async fn test_explanation_failure_discards_results() {
        let completion = ScriptedCompletion::new(vec![
            titles(&["Movie A"]),
            Err(Error::upstream("openai", "timeout")),
        ]);
        let resolver = Arc::new(FakeResolver::new(&[("Movie A", Lookup::Found(vec!["Comedy"]))]));
        let engine = engine(completion, resolver);
        let mut transcript = Transcript::new();

        let movies = engine
            .recommend("anything", &GenreFilter::default(), &mut transcript)
            .await;

        assert!(movies.is_empty());
        assert_eq!(assistant_messages(&transcript), vec![FALLBACK_MESSAGE]);

        let err = engine_with_failing_explanation()
            .try_recommend("anything", &GenreFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::Explaining);
    }

    fn engine_with_failing_explanation() -> RecommendationEngine {
        let completion = ScriptedCompletion::new(vec![
            titles(&[]),
            Err(Error::upstream("openai", "timeout")),
        ]);
        engine(completion, Arc::new(FakeResolver::new(&[])))
    }

    #[tokio::test]
    async fn test_blank_request_is_ignored() {
        let completion = ScriptedCompletion::new(vec![]);
        let engine = engine(completion.clone(), Arc::new(FakeResolver::new(&[])));
        let mut transcript = Transcript::with_greeting();

        let movies = engine
            .recommend("   \n\t", &GenreFilter::default(), &mut transcript)
            .await;

        assert!(movies.is_empty());
        assert_eq!(transcript.len(), 1, "only the greeting should remain");
        assert!(completion.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_request_text_is_trimmed() {
        let completion = ScriptedCompletion::new(vec![titles(&[]), Ok("ok".into())]);
        let engine = engine(completion, Arc::new(FakeResolver::new(&[])));
        let mut transcript = Transcript::new();

        engine
            .recommend("  a quiet drama  ", &GenreFilter::default(), &mut transcript)
            .await;

        assert_eq!(transcript.snapshot()[0].content(), "a quiet drama");
    }

    #[tokio::test]
    async fn test_empty_title_list_is_not_an_error() {
        let completion =
            ScriptedCompletion::new(vec![titles(&[]), Ok("Nothing fits.".to_string())]);
        let engine = engine(completion, Arc::new(FakeResolver::new(&[])));
        let mut transcript = Transcript::new();

        let movies = engine
            .recommend("anything", &GenreFilter::new(["horror"]), &mut transcript)
            .await;

        assert!(movies.is_empty());
        assert_eq!(assistant_messages(&transcript), vec!["Nothing fits."]);
    }

    #[tokio::test]
    async fn test_untagged_records_follow_filter_state() {
        let resolver = Arc::new(FakeResolver::new(&[
            ("Tagged", Lookup::Found(vec!["Horror"])),
            ("Untagged", Lookup::Found(vec![])),
        ]));

        let completion =
            ScriptedCompletion::new(vec![titles(&["Tagged", "Untagged"]), Ok("ok".into())]);
        let all = engine(completion, resolver.clone())
            .try_recommend("scary", &GenreFilter::default())
            .await
            .unwrap();
        assert_eq!(all.movies.len(), 2);

        let completion =
            ScriptedCompletion::new(vec![titles(&["Tagged", "Untagged"]), Ok("ok".into())]);
        let filtered = engine(completion, resolver)
            .try_recommend("scary", &GenreFilter::new(["horror"]))
            .await
            .unwrap();
        assert_eq!(filtered.movies.len(), 1);
        assert_eq!(filtered.movies[0].title, "Tagged");
        assert_eq!(filtered.titles, vec!["Tagged", "Untagged"]);
    }

    // ============================================================================
    // Concurrency
    // ============================================================================

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let names = ["One", "Two", "Three", "Four"];
        let completion = ScriptedCompletion::new(vec![titles(&names), Ok("ok".into())]);
        let entries: Vec<(&str, Lookup)> = names
            .iter()
            .map(|name| (*name, Lookup::Found(vec!["Drama"])))
            .collect();
        // Each lookup blocks until all four are in flight
        let resolver = Arc::new(FakeResolver::new(&entries).with_barrier(names.len()));
        let engine = engine(completion, resolver);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            engine.try_recommend("anything", &GenreFilter::default()),
        )
        .await
        .expect("lookups should not run one at a time")
        .unwrap();

        assert_eq!(result.movies.len(), 4);
    }

    #[tokio::test]
    async fn test_result_order_follows_titles_not_completion() {
        let completion = ScriptedCompletion::new(vec![titles(&["Slow", "Fast"]), Ok("ok".into())]);
        let resolver = Arc::new(FakeResolver::new(&[
            ("Slow", Lookup::Slow(50, vec!["Drama"])),
            ("Fast", Lookup::Found(vec!["Drama"])),
        ]));
        let engine = engine(completion, resolver);

        let result = engine
            .try_recommend("anything", &GenreFilter::default())
            .await
            .unwrap();
        let order: Vec<_> = result.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(order, vec!["Slow", "Fast"]);
    }

    #[tokio::test]
    async fn test_consecutive_requests_keep_causal_order() {
        let completion = ScriptedCompletion::new(vec![
            titles(&["Slow"]),
            Ok("first reply".into()),
            Ok("oops".into()),
        ]);
        let resolver = Arc::new(FakeResolver::new(&[("Slow", Lookup::Slow(20, vec!["Drama"]))]));
        let engine = engine(completion, resolver);
        let mut transcript = Transcript::with_greeting();

        engine.recommend("first", &GenreFilter::default(), &mut transcript).await;
        engine.recommend("second", &GenreFilter::default(), &mut transcript).await;

        let contents: Vec<_> = transcript.iter().map(|m| m.content().to_string()).collect();
        assert_eq!(contents.len(), 5);
        assert_eq!(&contents[1..], &["first", "first reply", "second", FALLBACK_MESSAGE]);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::AwaitingTitles.to_string(), "awaiting titles");
        assert_eq!(Stage::Resolving.to_string(), "resolving");
        assert_eq!(Stage::Errored.to_string(), "errored");
    }
}
