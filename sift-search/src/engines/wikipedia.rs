//! Wikipedia full-text search API.
//!
//! Search hits carry a `timestamp`, but it is the time of the last edit,
//! not of publication. It is deliberately not reported as `published_at`:
//! the freshness scorer would otherwise treat every recently-touched
//! article as new.

use serde_json::Value;
use url::Url;

use crate::engine::{FetchContext, ProviderAdapter};
use crate::error::SearchError;
use crate::http;
use crate::types::{ProviderTag, RawResult};

use super::text::fragment_text;

/// Article URLs are built under this base.
const ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

/// Wikipedia search client.
pub struct WikipediaAdapter;

impl ProviderAdapter for WikipediaAdapter {
    async fn fetch(
        &self,
        query: &str,
        budget: usize,
        ctx: &FetchContext<'_>,
    ) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, "wikipedia search");

        let limit = budget.to_string();
        let request = ctx
            .client
            .get(ctx.endpoint(ProviderTag::Wikipedia))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("origin", "*"),
            ])
            .header("Accept", "application/json")
            .timeout(ctx.config.provider_timeout());

        let response = http::send(ProviderTag::Wikipedia, request).await?;
        let body = http::read_text(ProviderTag::Wikipedia, response).await?;

        Ok(parse_wikipedia_search(&body, budget))
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::Wikipedia
    }
}

/// Parse a `list=search` response. Entries without a title are skipped;
/// a payload that is not JSON yields no candidates.
pub(crate) fn parse_wikipedia_search(body: &str, budget: usize) -> Vec<RawResult> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "wikipedia payload is not JSON");
            return Vec::new();
        }
    };

    let hits = data
        .pointer("/query/search")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let results: Vec<RawResult> = hits
        .iter()
        .filter_map(|hit| {
            let title = hit.get("title").and_then(Value::as_str)?.trim();
            let url = article_url(title)?;
            let snippet = hit
                .get("snippet")
                .and_then(Value::as_str)
                .map(fragment_text)
                .unwrap_or_default();
            Some(RawResult {
                title: title.to_string(),
                url,
                snippet,
                source_engine: ProviderTag::Wikipedia,
                published_at: None,
            })
        })
        .take(budget)
        .collect();

    tracing::debug!(count = results.len(), "wikipedia results parsed");
    results
}

/// Article URL for `title`, with spaces as underscores and the title
/// percent-encoded as a single path segment.
fn article_url(title: &str) -> Option<String> {
    if title.is_empty() {
        return None;
    }
    let mut url = Url::parse(ARTICLE_BASE).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push(&title.replace(' ', "_"));
    Some(url.to_string())
}
