//! DuckDuckGo lite results page.
//!
//! The lite page is a bare table of links with little structure, so every
//! anchor is a candidate. Short labels are icon or navigation links and are
//! ignored. Snippets are never available from this provider.

use crate::engine::{FetchContext, ProviderAdapter};
use crate::error::SearchError;
use crate::http;
use crate::types::{ProviderTag, RawResult};
use scraper::{Html, Selector};

use super::text::{compact_ws, resolve_result_link};

/// Minimum visible label length, in characters, for an anchor to count.
const MIN_LABEL_CHARS: usize = 2;

/// DuckDuckGo lite scraper.
pub struct DdgLiteAdapter;

impl ProviderAdapter for DdgLiteAdapter {
    async fn fetch(
        &self,
        query: &str,
        budget: usize,
        ctx: &FetchContext<'_>,
    ) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, "ddg_lite search");

        let request = ctx
            .client
            .get(ctx.endpoint(ProviderTag::DdgLite))
            .query(&[("q", query)])
            .header("Accept", http::ACCEPT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .timeout(ctx.config.provider_timeout());

        let response = http::send(ProviderTag::DdgLite, request).await?;
        let html = http::read_text(ProviderTag::DdgLite, response).await?;

        parse_ddg_lite_html(&html, budget)
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::DdgLite
    }
}

/// Parse a DuckDuckGo lite page: every anchor with a resolvable `http(s)`
/// link and a label of at least two characters.
pub(crate) fn parse_ddg_lite_html(
    html: &str,
    budget: usize,
) -> Result<Vec<RawResult>, SearchError> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse("a[href]")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;

    let mut results = Vec::new();
    for anchor in document.select(&link_sel) {
        if results.len() >= budget {
            break;
        }

        let label = compact_ws(&anchor.text().collect::<String>());
        if label.chars().count() < MIN_LABEL_CHARS {
            continue;
        }
        let Some(url) = anchor.value().attr("href").and_then(resolve_result_link) else {
            continue;
        };

        results.push(RawResult {
            title: label,
            url,
            snippet: String::new(),
            source_engine: ProviderTag::DdgLite,
            published_at: None,
        });
    }

    tracing::debug!(count = results.len(), "ddg_lite results parsed");
    Ok(results)
}
