//! DuckDuckGo instant-answer API, a low-volume structured source.
//!
//! The API returns an abstract plus groups of "related topics". Many of
//! those entries point back at DuckDuckGo itself or are only loosely
//! related to the query, so candidates are filtered for token overlap with
//! the query and for external hosts.

use std::collections::HashSet;

use serde_json::Value;

use crate::engine::{FetchContext, ProviderAdapter};
use crate::error::SearchError;
use crate::http;
use crate::types::{ProviderTag, RawResult};

use super::text::{compact_ws, truncate_chars};

/// Snippets from this API are capped to this many characters.
const MAX_SNIPPET_CHARS: usize = 280;

/// Fallback title length when a topic text has no ` - ` separator.
const MAX_TITLE_CHARS: usize = 80;

/// Tokens shorter than this are ignored by the relevance filter.
const MIN_TOKEN_CHARS: usize = 3;

/// Host suffix of the provider's own pages.
const SELF_HOST_SUFFIX: &str = "duckduckgo.com";

/// DuckDuckGo instant-answer client.
pub struct DdgInstantAdapter;

impl ProviderAdapter for DdgInstantAdapter {
    async fn fetch(
        &self,
        query: &str,
        budget: usize,
        ctx: &FetchContext<'_>,
    ) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, "ddg_instant search");

        let request = ctx
            .client
            .get(ctx.endpoint(ProviderTag::DdgInstant))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_redirect", "1"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .header("Accept", "application/json")
            .timeout(ctx.config.provider_timeout());

        let response = http::send(ProviderTag::DdgInstant, request).await?;
        let body = http::read_text(ProviderTag::DdgInstant, response).await?;

        Ok(parse_instant_answer(&body, query, budget))
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::DdgInstant
    }
}

/// Parse an instant-answer JSON payload.
///
/// A payload that is not JSON yields no candidates rather than an error.
pub(crate) fn parse_instant_answer(body: &str, query: &str, budget: usize) -> Vec<RawResult> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "ddg_instant payload is not JSON");
            return Vec::new();
        }
    };

    let filter = RelevanceFilter::new(query);
    let mut results = Vec::new();

    let heading = str_field(&data, "Heading");
    let abstract_text = str_field(&data, "AbstractText");
    let abstract_url = str_field(&data, "AbstractURL");
    if let (Some(text), Some(url)) = (abstract_text, abstract_url) {
        let heading = heading.unwrap_or_default();
        if is_external_http(url) && filter.is_relevant(&format!("{heading} {text}")) {
            results.push(RawResult {
                title: if heading.is_empty() {
                    query.to_string()
                } else {
                    compact_ws(heading)
                },
                url: url.trim().to_string(),
                snippet: truncate_chars(&compact_ws(text), MAX_SNIPPET_CHARS),
                source_engine: ProviderTag::DdgInstant,
                published_at: None,
            });
        }
    }

    let topics = data
        .get("RelatedTopics")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for topic in topics {
        if results.len() >= budget {
            break;
        }
        if let Some(candidate) = topic_candidate(topic, &filter) {
            results.push(candidate);
        } else if let Some(nested) = topic.get("Topics").and_then(Value::as_array) {
            for inner in nested {
                if results.len() >= budget {
                    break;
                }
                if let Some(candidate) = topic_candidate(inner, &filter) {
                    results.push(candidate);
                }
            }
        }
    }

    results.truncate(budget);
    tracing::debug!(count = results.len(), "ddg_instant results parsed");
    results
}

/// Build a candidate from a single related-topic entry, if it passes the
/// external-host and relevance checks.
fn topic_candidate(topic: &Value, filter: &RelevanceFilter) -> Option<RawResult> {
    let url = str_field(topic, "FirstURL")?;
    let text = compact_ws(str_field(topic, "Text")?);
    if !is_external_http(url) || !filter.is_relevant(&text) {
        return None;
    }

    let title = text
        .split(" - ")
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| truncate_chars(&text, MAX_TITLE_CHARS), str::to_string);

    Some(RawResult {
        title,
        url: url.trim().to_string(),
        snippet: truncate_chars(&text, MAX_SNIPPET_CHARS),
        source_engine: ProviderTag::DdgInstant,
        published_at: None,
    })
}

/// Non-empty string field of a JSON object.
fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// An absolute `http(s)` URL whose host is not the provider's own.
fn is_external_http(value: &str) -> bool {
    let Ok(url) = url::Url::parse(value.trim()) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    url.host_str()
        .is_some_and(|host| !host.to_ascii_lowercase().ends_with(SELF_HOST_SUFFIX))
}

/// Token-overlap check between the query and candidate text.
struct RelevanceFilter {
    query_tokens: HashSet<String>,
}

impl RelevanceFilter {
    fn new(query: &str) -> Self {
        Self {
            query_tokens: tokens(query).collect(),
        }
    }

    /// A candidate with no usable tokens, or a query with none, passes.
    fn is_relevant(&self, text: &str) -> bool {
        if self.query_tokens.is_empty() {
            return true;
        }
        let mut candidate = tokens(text).peekable();
        if candidate.peek().is_none() {
            return true;
        }
        candidate.any(|token| self.query_tokens.contains(&token))
    }
}

/// Lower-cased word tokens of at least [`MIN_TOKEN_CHARS`] characters.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_INSTANT_JSON: &str = r#"{
        "Heading": "Node.js",
        "AbstractText": "Node.js is a cross-platform JavaScript runtime environment.",
        "AbstractURL": "https://en.wikipedia.org/wiki/Node.js",
        "RelatedTopics": [
            {"FirstURL": "https://duckduckgo.com/Deno", "Text": "Deno - A secure runtime for JavaScript"},
            {"FirstURL": "https://nodejs.org/", "Text": "Node.js - Official site for the node runtime"},
            {"FirstURL": "https://example.com/cooking", "Text": "Cooking pasta at home"},
            {"Name": "Runtimes", "Topics": [
                {"FirstURL": "https://bun.sh/", "Text": "Bun - Fast runtime and toolkit"},
                {"FirstURL": 42, "Text": "malformed entry"},
                {"Text": "No link runtime"}
            ]},
            "not an object"
        ]
    }"#;

    #[test]
    fn abstract_is_first_candidate() {
        let results = parse_instant_answer(MOCK_INSTANT_JSON, "node runtime", 10);
        assert_eq!(results[0].title, "Node.js");
        assert_eq!(results[0].url, "https://en.wikipedia.org/wiki/Node.js");
        assert_eq!(results[0].source_engine, ProviderTag::DdgInstant);
    }

    #[test]
    fn self_referential_and_irrelevant_topics_dropped() {
        let results = parse_instant_answer(MOCK_INSTANT_JSON, "node runtime", 10);
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert!(!urls.iter().any(|u| u.contains("duckduckgo.com")));
        assert!(!urls.contains(&"https://example.com/cooking"));
        assert!(urls.contains(&"https://nodejs.org/"));
    }

    #[test]
    fn nested_topic_groups_walked_one_level() {
        let results = parse_instant_answer(MOCK_INSTANT_JSON, "node runtime", 10);
        let bun = results
            .iter()
            .find(|r| r.url == "https://bun.sh/")
            .expect("nested topic");
        assert_eq!(bun.title, "Bun");
        assert_eq!(bun.snippet, "Bun - Fast runtime and toolkit");
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn respects_budget() {
        let results = parse_instant_answer(MOCK_INSTANT_JSON, "node runtime", 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn non_json_payload_yields_nothing() {
        assert!(parse_instant_answer("<html>rate limited</html>", "node", 5).is_empty());
        assert!(parse_instant_answer("[]", "node", 5).is_empty());
    }

    #[test]
    fn heading_falls_back_to_query() {
        let body = r#"{"AbstractText": "Duck abstract about testing", "AbstractURL": "https://en.wikipedia.org/wiki/Test"}"#;
        let results = parse_instant_answer(body, "testing", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "testing");
    }

    #[test]
    fn snippet_truncated_to_limit() {
        let long_text = "runtime ".repeat(100);
        let body = serde_json::json!({
            "AbstractText": long_text,
            "AbstractURL": "https://example.org/runtime",
            "Heading": "Runtime"
        })
        .to_string();
        let results = parse_instant_answer(&body, "runtime", 5);
        assert_eq!(results[0].snippet.chars().count(), MAX_SNIPPET_CHARS);
    }

    #[test]
    fn short_query_tokens_disable_filter() {
        let filter = RelevanceFilter::new("go");
        assert!(filter.is_relevant("completely unrelated text"));
    }

    #[test]
    fn overlap_required_when_both_sides_have_tokens() {
        let filter = RelevanceFilter::new("node runtime");
        assert!(filter.is_relevant("The Node platform"));
        assert!(!filter.is_relevant("Cooking pasta"));
        assert!(filter.is_relevant("a b"));
    }

    #[test]
    fn provider_is_ddg_instant() {
        assert_eq!(DdgInstantAdapter.provider(), ProviderTag::DdgInstant);
    }
}
