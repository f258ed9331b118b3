//! Trait definition for pluggable provider adapters.
//!
//! Each external source (two DuckDuckGo HTML pages, the DuckDuckGo
//! instant-answer API, Wikipedia search and Bing RSS) implements
//! [`ProviderAdapter`] to provide a uniform interface for querying and
//! parsing candidates. Parsing lives in pure functions next to each adapter
//! so it can be tested against fixtures without a network.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{ProviderTag, RawResult};

/// Per-request state shared by every adapter call.
#[derive(Debug, Clone, Copy)]
pub struct FetchContext<'a> {
    /// Shared HTTP client.
    pub client: &'a reqwest::Client,
    /// Pipeline configuration (endpoints, timeouts).
    pub config: &'a SearchConfig,
    /// Caller locale, e.g. `en-US`.
    pub locale: &'a str,
}

impl FetchContext<'_> {
    /// The configured endpoint for `provider`.
    pub fn endpoint(&self, provider: ProviderTag) -> &str {
        self.config.endpoints.for_provider(provider)
    }
}

/// A pluggable search provider backend.
///
/// Implementors issue exactly one outbound call per invocation, bounded by
/// the configured per-provider timeout, and extract [`RawResult`] values
/// from the response. Retries are not the adapter's concern: the
/// orchestrator wraps every call in [`crate::retry::with_retries`].
///
/// Malformed entries in a response are skipped rather than failing the
/// whole parse.
///
/// All implementations must be `Send + Sync` for concurrent fan-out.
pub trait ProviderAdapter: Send + Sync {
    /// Fetch up to `budget` candidates for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] or [`SearchError::Timeout`] for
    /// network failures and non-success statuses.
    fn fetch(
        &self,
        query: &str,
        budget: usize,
        ctx: &FetchContext<'_>,
    ) -> impl std::future::Future<Output = Result<Vec<RawResult>, SearchError>> + Send;

    /// Returns which [`ProviderTag`] this implementation represents.
    fn provider(&self) -> ProviderTag;

    /// Returns the ranking weight for results from this provider.
    fn weight(&self) -> f64 {
        self.provider().weight()
    }
}
