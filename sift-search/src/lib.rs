//! # sift-search
//!
//! Multi-provider web search with trust, freshness and diversity ranking.
//!
//! This crate queries several public, keyless search sources concurrently,
//! normalises their very different response shapes into one candidate type,
//! scores every candidate on independent signals, removes duplicates and
//! returns a bounded, domain-diversified, quality-ranked list.
//!
//! ## Design
//!
//! - Five providers: DuckDuckGo HTML and lite pages, the DuckDuckGo
//!   instant-answer API, Wikipedia search and Bing RSS
//! - Each provider call has its own timeout and a bounded, jittered retry
//! - A request-level budget cancels outstanding providers when it elapses
//! - Graceful degradation: failed providers contribute nothing, and a
//!   search where every provider failed returns an empty list
//! - No state is shared between requests beyond the HTTP client
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - Search queries are logged only at trace level
//! - Snippets are stripped of markup before being returned

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod request;
pub mod retry;
pub mod types;

pub use config::{Endpoints, SearchConfig};
pub use engine::{FetchContext, ProviderAdapter};
pub use error::{Result, SearchError};
pub use orchestrator::search::{ProviderSummary, SearchOutcome, Searcher};
pub use request::{SearchOptions, SearchRequest};
pub use types::{EvidenceQuality, NormalizedResult, ProviderTag, RawResult, ScoredResult};

/// Search the web across all configured providers.
///
/// Builds a one-off [`Searcher`]; long-running callers should keep a
/// `Searcher` instead so the HTTP connection pool is reused.
///
/// An empty list is a normal outcome: it means no provider produced a
/// usable result.
///
/// # Errors
///
/// Returns [`SearchError::Validation`] for an empty query and
/// [`SearchError::Config`] for an invalid configuration. Provider failures
/// are never reported as errors.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> sift_search::Result<()> {
/// let config = sift_search::SearchConfig::default();
/// let options = sift_search::SearchOptions::default();
/// let results = sift_search::search("rust programming", options, &config).await?;
/// for result in &results {
///     println!("{:.3} {}: {}", result.score, result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    query: &str,
    options: SearchOptions,
    config: &SearchConfig,
) -> Result<Vec<ScoredResult>> {
    let request = SearchRequest::new(query, options)?;
    let searcher = Searcher::new(config.clone())?;
    Ok(searcher.search(&request).await.results)
}
