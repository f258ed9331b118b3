//! Shared HTTP client with User-Agent rotation for provider requests.
//!
//! One [`reqwest::Client`] is built per [`crate::Searcher`] and shared by
//! every adapter. Timeouts are applied per request so that each outbound
//! provider call gets its own budget.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::ProviderTag;
use rand::seq::SliceRandom;
use reqwest::{RequestBuilder, Response};

/// Realistic browser User-Agent strings, one picked per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// `Accept` header sent with every provider request.
pub(crate) const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Build a [`reqwest::Client`] configured for provider requests.
///
/// The client has:
/// - Cookie store enabled
/// - Random User-Agent from built-in rotation list (or custom if configured)
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Send a provider request and reject non-success statuses.
pub(crate) async fn send(
    provider: ProviderTag,
    request: RequestBuilder,
) -> Result<Response, SearchError> {
    let response = request
        .send()
        .await
        .map_err(|e| classify(provider, "request failed", &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Http(format!("{provider} status {status}")));
    }
    Ok(response)
}

/// Read a provider response body as text.
pub(crate) async fn read_text(
    provider: ProviderTag,
    response: Response,
) -> Result<String, SearchError> {
    response
        .text()
        .await
        .map_err(|e| classify(provider, "response read failed", &e))
}

fn classify(provider: ProviderTag, context: &str, err: &reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(format!("{provider} {context}: {err}"))
    } else {
        SearchError::Http(format!("{provider} {context}: {err}"))
    }
}
