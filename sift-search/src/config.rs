//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which providers are queried, per-provider and
//! per-request time budgets, retry behaviour and provider endpoints. The
//! defaults match the public endpoints; tests override [`Endpoints`] to
//! point adapters at a local mock server.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::ProviderTag;

/// Base URLs for every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub ddg_html: String,
    pub ddg_lite: String,
    pub ddg_instant: String,
    pub wikipedia: String,
    pub bing_rss: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ddg_html: "https://html.duckduckgo.com/html/".into(),
            ddg_lite: "https://lite.duckduckgo.com/lite/".into(),
            ddg_instant: "https://api.duckduckgo.com/".into(),
            wikipedia: "https://en.wikipedia.org/w/api.php".into(),
            bing_rss: "https://www.bing.com/search".into(),
        }
    }
}

impl Endpoints {
    /// Point every provider at `base` (e.g. a mock server URI), keeping the
    /// real endpoint paths.
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            ddg_html: format!("{base}/html/"),
            ddg_lite: format!("{base}/lite/"),
            ddg_instant: format!("{base}/instant/"),
            wikipedia: format!("{base}/w/api.php"),
            bing_rss: format!("{base}/search"),
        }
    }

    /// Returns the endpoint for `provider`.
    pub fn for_provider(&self, provider: ProviderTag) -> &str {
        match provider {
            ProviderTag::DdgHtml => &self.ddg_html,
            ProviderTag::DdgLite => &self.ddg_lite,
            ProviderTag::DdgInstant => &self.ddg_instant,
            ProviderTag::Wikipedia => &self.wikipedia,
            ProviderTag::BingRss => &self.bing_rss,
        }
    }
}

/// Configuration for the search pipeline.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which providers to query. Queried concurrently; results are merged.
    pub providers: Vec<ProviderTag>,
    /// Timeout for a single outbound provider call, in milliseconds.
    pub provider_timeout_ms: u64,
    /// Budget for a whole search request, in milliseconds. When it elapses
    /// every in-flight provider call is cancelled.
    pub request_timeout_ms: u64,
    /// Total attempts per provider (first try included).
    pub retry_attempts: u32,
    /// Random backoff range in milliseconds `(min, max)` between attempts.
    pub retry_jitter_ms: (u64, u64),
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Provider base URLs.
    pub endpoints: Endpoints,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            providers: ProviderTag::all().to_vec(),
            provider_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            retry_attempts: 2,
            retry_jitter_ms: (100, 350),
            user_agent: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `provider_timeout_ms` and `request_timeout_ms` must be greater than 0
    /// - `retry_attempts` must be at least 1
    /// - `retry_jitter_ms.0` must be <= `retry_jitter_ms.1`
    /// - `providers` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.provider_timeout_ms == 0 {
            return Err(SearchError::Config(
                "provider_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(SearchError::Config(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.retry_attempts == 0 {
            return Err(SearchError::Config(
                "retry_attempts must be at least 1".into(),
            ));
        }
        if self.retry_jitter_ms.0 > self.retry_jitter_ms.1 {
            return Err(SearchError::Config(
                "retry_jitter_ms min must be <= max".into(),
            ));
        }
        if self.providers.is_empty() {
            return Err(SearchError::Config(
                "at least one provider must be enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
