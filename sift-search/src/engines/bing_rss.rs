//! Bing results rendered as an RSS feed (`format=rss`).
//!
//! The feed is small and regular, so `<item>` records are pulled out with
//! regular expressions rather than a full XML parser.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::engine::{FetchContext, ProviderAdapter};
use crate::error::SearchError;
use crate::http;
use crate::types::{ProviderTag, RawResult};

use super::text::{compact_ws, decode_entities, fragment_text, is_http_url};

static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| feed_pattern(r"(?is)<item\b[^>]*>(.*?)</item>"));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| feed_pattern(r"(?is)<title\b[^>]*>(.*?)</title>"));
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| feed_pattern(r"(?is)<link\b[^>]*>(.*?)</link>"));
static DESC_RE: LazyLock<Regex> =
    LazyLock::new(|| feed_pattern(r"(?is)<description\b[^>]*>(.*?)</description>"));
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| feed_pattern(r"(?is)<pubDate\b[^>]*>(.*?)</pubDate>"));

fn feed_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).expect("feed regex must compile")
}

/// Bing RSS client.
pub struct BingRssAdapter;

impl ProviderAdapter for BingRssAdapter {
    async fn fetch(
        &self,
        query: &str,
        budget: usize,
        ctx: &FetchContext<'_>,
    ) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, "bing_rss search");

        let request = ctx
            .client
            .get(ctx.endpoint(ProviderTag::BingRss))
            .query(&[("q", query), ("format", "rss")])
            .header("Accept", http::ACCEPT)
            .timeout(ctx.config.provider_timeout());

        let response = http::send(ProviderTag::BingRss, request).await?;
        let xml = http::read_text(ProviderTag::BingRss, response).await?;

        Ok(parse_rss_items(&xml, budget))
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::BingRss
    }
}

/// Parse RSS `<item>` records into candidates.
///
/// Items without an `http(s)` `<link>` are dropped. `<pubDate>` (RFC 2822)
/// is reported as the publication time when it parses.
pub(crate) fn parse_rss_items(xml: &str, budget: usize) -> Vec<RawResult> {
    let mut results = Vec::new();
    for item_cap in ITEM_RE.captures_iter(xml) {
        if results.len() >= budget {
            break;
        }
        let Some(item) = item_cap.get(1).map(|m| m.as_str()) else {
            continue;
        };

        let link = capture(&LINK_RE, item)
            .map(|raw| compact_ws(&raw))
            .unwrap_or_default();
        if !is_http_url(&link) {
            continue;
        }

        let title = capture(&TITLE_RE, item)
            .map(|raw| compact_ws(&raw))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| link.clone());
        let snippet = capture(&DESC_RE, item)
            .map(|raw| fragment_text(&raw))
            .unwrap_or_default();
        let published_at = capture(&DATE_RE, item).and_then(|raw| parse_pub_date(&raw));

        results.push(RawResult {
            title,
            url: link,
            snippet,
            source_engine: ProviderTag::BingRss,
            published_at,
        });
    }

    tracing::debug!(count = results.len(), "bing_rss results parsed");
    results
}

fn capture(re: &Regex, item: &str) -> Option<String> {
    re.captures(item)
        .and_then(|cap| cap.get(1))
        .map(|m| decode_entities(m.as_str()))
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const MOCK_RSS: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rss version="2.0">
<channel>
  <title>Bing: node runtime</title>
  <link>https://www.bing.com/search?q=node+runtime</link>
  <item>
    <title>Node.js &#8212; Run JavaScript Everywhere</title>
    <link>https://nodejs.org/en</link>
    <description>Node.js&amp;reg; is a free, open-source, cross-platform JavaScript runtime environment.</description>
    <pubDate>Tue, 14 Oct 2025 08:30:00 GMT</pubDate>
  </item>
  <item>
    <title>Broken entry</title>
    <link>/relative/link</link>
    <description>no absolute link</description>
  </item>
  <item>
    <title></title>
    <link>https://example.com/untitled</link>
    <description><![CDATA[Some <b>bold</b> text]]></description>
    <pubDate>not a date</pubDate>
  </item>
</channel>
</rss>"#;

    #[test]
    fn parses_items_with_http_links() {
        let results = parse_rss_items(MOCK_RSS, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Node.js \u{2014} Run JavaScript Everywhere");
        assert_eq!(results[0].url, "https://nodejs.org/en");
        assert!(results[0].snippet.starts_with("Node.js"));
        assert_eq!(results[0].source_engine, ProviderTag::BingRss);
    }

    #[test]
    fn channel_link_is_not_an_item() {
        let results = parse_rss_items(MOCK_RSS, 10);
        assert!(results.iter().all(|r| !r.url.contains("bing.com")));
    }

    #[test]
    fn pub_date_becomes_published_at() {
        let results = parse_rss_items(MOCK_RSS, 10);
        let published = results[0].published_at.expect("pubDate parsed");
        assert_eq!(published.year(), 2025);
        assert_eq!(published.month(), 10);
        assert!(results[1].published_at.is_none());
    }

    #[test]
    fn empty_title_falls_back_to_link_and_cdata_unwrapped() {
        let results = parse_rss_items(MOCK_RSS, 10);
        assert_eq!(results[1].title, "https://example.com/untitled");
        assert_eq!(results[1].snippet, "Some bold text");
    }

    #[test]
    fn respects_budget() {
        let results = parse_rss_items(MOCK_RSS, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn non_feed_payload_yields_nothing() {
        let results = parse_rss_items("<html><body>captcha</body></html>", 10);
        assert!(results.is_empty());
    }

    #[test]
    fn provider_is_bing_rss() {
        assert_eq!(BingRssAdapter.provider(), ProviderTag::BingRss);
    }
}
