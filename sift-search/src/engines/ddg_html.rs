//! DuckDuckGo HTML results page, the highest-volume web provider.
//!
//! Uses the JavaScript-free endpoint at `https://html.duckduckgo.com/html/`,
//! which accepts a form POST and is tolerant of automated requests.

use crate::engine::{FetchContext, ProviderAdapter};
use crate::error::SearchError;
use crate::http;
use crate::types::{ProviderTag, RawResult};
use scraper::{Html, Selector};

use super::text::{compact_ws, resolve_result_link};

/// DuckDuckGo HTML scraper.
pub struct DdgHtmlAdapter;

impl ProviderAdapter for DdgHtmlAdapter {
    async fn fetch(
        &self,
        query: &str,
        budget: usize,
        ctx: &FetchContext<'_>,
    ) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, "ddg_html search");

        let region = ctx.locale.replace('-', "_");
        let request = ctx
            .client
            .post(ctx.endpoint(ProviderTag::DdgHtml))
            .form(&[("q", query), ("kl", region.as_str())])
            .header("Accept", http::ACCEPT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .timeout(ctx.config.provider_timeout());

        let response = http::send(ProviderTag::DdgHtml, request).await?;
        let html = http::read_text(ProviderTag::DdgHtml, response).await?;

        tracing::trace!(bytes = html.len(), "ddg_html response received");

        parse_ddg_html(&html, budget)
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::DdgHtml
    }
}

/// Parse a DuckDuckGo HTML results page into candidates.
///
/// Each `div.result` block contributes its `a.result__a` link and title and
/// its `.result__snippet` text. Redirect-wrapped links are unwrapped; blocks
/// without a resolvable `http(s)` link are dropped. Ads are skipped.
pub(crate) fn parse_ddg_html(html: &str, budget: usize) -> Result<Vec<RawResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse("div.result:not(.result--ad)")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse("a.result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        if results.len() >= budget {
            break;
        }

        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };
        let Some(url) = title_el.value().attr("href").and_then(resolve_result_link) else {
            continue;
        };

        let title = compact_ws(&title_el.text().collect::<String>());
        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| compact_ws(&el.text().collect::<String>()))
            .unwrap_or_default();

        results.push(RawResult {
            title: if title.is_empty() { url.clone() } else { title },
            url,
            snippet,
            source_engine: ProviderTag::DdgHtml,
            published_at: None,
        });
    }

    tracing::debug!(count = results.len(), "ddg_html results parsed");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_DDG_HTML: &str = r##"<!DOCTYPE html>
<html>
<body>
<div class="result results_links results_links_deep web-result">
  <div class="links_main result__body">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc123">
        Rust Programming Language
    </a>
    <a class="result__snippet" href="#">
        A language empowering everyone to build reliable and efficient software.
    </a>
  </div>
</div>
<div class="result result--ad">
  <a class="result__a" href="https://ads.example.com/">Sponsored (Ad)</a>
</div>
<div class="result results_links results_links_deep web-result">
  <a class="result__a" href="https://doc.rust-lang.org/book/">The Rust Book</a>
  <div class="result__snippet">An introductory book about Rust.</div>
</div>
<div class="result">
  <a class="result__a" href="/relative/only">Broken link</a>
</div>
<div class="result">
  <a class="result__a" href="https://en.wikipedia.org/wiki/Rust_(programming_language)"></a>
</div>
</body>
</html>"##;

    #[test]
    fn parse_mock_html_returns_results() {
        let results = parse_ddg_html(MOCK_DDG_HTML, 10).expect("should parse");
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "https://www.rust-lang.org/");
        assert!(results[0].snippet.contains("reliable and efficient"));
        assert_eq!(results[0].source_engine, ProviderTag::DdgHtml);

        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
        assert_eq!(results[1].snippet, "An introductory book about Rust.");
    }

    #[test]
    fn ads_and_unresolvable_links_are_dropped() {
        let results = parse_ddg_html(MOCK_DDG_HTML, 10).expect("should parse");
        assert!(results.iter().all(|r| !r.title.contains("(Ad)")));
        assert!(results.iter().all(|r| r.url.starts_with("http")));
    }

    #[test]
    fn empty_title_falls_back_to_url() {
        let results = parse_ddg_html(MOCK_DDG_HTML, 10).expect("should parse");
        let wiki = results
            .iter()
            .find(|r| r.url.contains("wikipedia.org"))
            .expect("wikipedia result");
        assert_eq!(wiki.title, wiki.url);
        assert!(wiki.snippet.is_empty());
    }

    #[test]
    fn parse_respects_budget() {
        let results = parse_ddg_html(MOCK_DDG_HTML, 2).expect("should parse");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn parse_empty_html_returns_empty() {
        let results = parse_ddg_html("<html><body></body></html>", 10).expect("should parse");
        assert!(results.is_empty());
    }

    #[test]
    fn minimal_result_block() {
        let html = r#"<div class="result"><a class="result__a" href="https://example.com/a">Example A</a><a class="result__snippet">Recent official update 2026.</a></div>"#;
        let results = parse_ddg_html(html, 10).expect("should parse");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Example A");
        assert_eq!(results[0].snippet, "Recent official update 2026.");
    }

    #[test]
    fn provider_is_ddg_html() {
        assert_eq!(DdgHtmlAdapter.provider(), ProviderTag::DdgHtml);
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DdgHtmlAdapter>();
    }
}
