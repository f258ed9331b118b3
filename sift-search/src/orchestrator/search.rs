//! Core search orchestrator: concurrent multi-provider fan-out, then
//! normalise, dedup, score, rank, diversify and truncate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::{FetchContext, ProviderAdapter};
use crate::engines::{
    BingRssAdapter, DdgHtmlAdapter, DdgInstantAdapter, DdgLiteAdapter, WikipediaAdapter,
};
use crate::error::SearchError;
use crate::http::build_client;
use crate::request::SearchRequest;
use crate::retry::{with_retries, RetryPolicy};
use crate::types::{ProviderTag, RawResult, ScoredResult};

use super::dedup::{deduplicate, diversify, sort_by_score, MAX_PER_DOMAIN};
use super::scoring::{score_result, ScoringContext};
use super::url_normalize::normalize;

/// Per-request tally of results returned by each provider, plus the number
/// of providers that failed after exhausting their retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProviderSummary {
    pub ddg_html: usize,
    pub ddg_lite: usize,
    pub bing_rss: usize,
    pub ddg_instant: usize,
    pub wikipedia: usize,
    pub failed: usize,
}

impl ProviderSummary {
    /// Record a successful provider call that produced `count` candidates.
    pub fn record(&mut self, provider: ProviderTag, count: usize) {
        let slot = match provider {
            ProviderTag::DdgHtml => &mut self.ddg_html,
            ProviderTag::DdgLite => &mut self.ddg_lite,
            ProviderTag::BingRss => &mut self.bing_rss,
            ProviderTag::DdgInstant => &mut self.ddg_instant,
            ProviderTag::Wikipedia => &mut self.wikipedia,
        };
        *slot += count;
    }

    /// Candidates returned by `provider`.
    pub fn count(&self, provider: ProviderTag) -> usize {
        match provider {
            ProviderTag::DdgHtml => self.ddg_html,
            ProviderTag::DdgLite => self.ddg_lite,
            ProviderTag::BingRss => self.bing_rss,
            ProviderTag::DdgInstant => self.ddg_instant,
            ProviderTag::Wikipedia => self.wikipedia,
        }
    }

    /// Total candidates across all providers.
    pub fn total(&self) -> usize {
        self.ddg_html + self.ddg_lite + self.bing_rss + self.ddg_instant + self.wikipedia
    }
}

/// Result of one search call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Ranked, diversified and truncated results. Empty when every provider failed.
    pub results: Vec<ScoredResult>,
    pub summary: ProviderSummary,
}

/// Long-lived search service.
///
/// Owns the HTTP client (connection pool and cookie store) and the
/// configuration. Requests share nothing else, so one `Searcher` can serve
/// any number of concurrent searches.
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
    client: reqwest::Client,
}

impl Searcher {
    /// Build a searcher from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = build_client(&config)?;
        Ok(Self { config, client })
    }

    /// Run a search with no external cancellation.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        self.search_with_cancel(request, &CancellationToken::new()).await
    }

    /// Run a search that stops early when `cancel` fires.
    ///
    /// # Pipeline
    ///
    /// 1. Fan out to every configured provider concurrently with
    ///    [`futures::future::join_all`], each call wrapped in the retry policy
    /// 2. Cancel outstanding provider calls once the request budget elapses
    /// 3. Log per-provider failures at warn level; tally the summary
    /// 4. Normalise, deduplicate, score, sort, diversify, truncate
    ///
    /// Provider failures (including cancellation) never fail the search;
    /// they just contribute nothing.
    pub async fn search_with_cancel(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        tracing::trace!(query = %request.query, "search started");

        let token = cancel.child_token();
        let fan_out = self.fan_out(request, &token);
        tokio::pin!(fan_out);

        let (raw, summary) = tokio::select! {
            gathered = &mut fan_out => gathered,
            () = tokio::time::sleep(self.config.request_timeout()) => {
                tracing::warn!(
                    budget_ms = self.config.request_timeout_ms,
                    "request budget elapsed, cancelling outstanding providers"
                );
                token.cancel();
                fan_out.await
            }
        };

        let results = rank(raw, request, Utc::now());

        tracing::info!(
            ddg_html = summary.ddg_html,
            ddg_lite = summary.ddg_lite,
            bing_rss = summary.bing_rss,
            ddg_instant = summary.ddg_instant,
            wikipedia = summary.wikipedia,
            failed = summary.failed,
            ranked = results.len(),
            "search providers settled"
        );

        SearchOutcome { results, summary }
    }

    /// Query every configured provider and wait for all of them to settle.
    async fn fan_out(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> (Vec<RawResult>, ProviderSummary) {
        let ctx = FetchContext {
            client: &self.client,
            config: &self.config,
            locale: &request.locale,
        };
        let policy = RetryPolicy::from_config(&self.config);

        let futures: Vec<_> = self
            .config
            .providers
            .iter()
            .map(|&provider| {
                let budget = provider.candidate_budget(request.max_results);
                let query = request.query.as_str();
                let ctx = &ctx;
                async move {
                    let outcome = with_retries(&policy, cancel, |attempt| {
                        tracing::trace!(%provider, attempt, "provider attempt");
                        query_provider(provider, query, budget, ctx)
                    })
                    .await;
                    (provider, outcome)
                }
            })
            .collect();

        let outcomes = futures::future::join_all(futures).await;

        let mut raw = Vec::new();
        let mut summary = ProviderSummary::default();
        for (provider, outcome) in outcomes {
            match outcome {
                Ok(results) => {
                    tracing::debug!(%provider, count = results.len(), "provider returned results");
                    summary.record(provider, results.len());
                    raw.extend(results);
                }
                Err(err) => {
                    tracing::warn!(%provider, error = %err, "provider failed");
                    summary.failed += 1;
                }
            }
        }
        (raw, summary)
    }
}

/// Query a single provider, dispatching to the concrete adapter.
async fn query_provider(
    provider: ProviderTag,
    query: &str,
    budget: usize,
    ctx: &FetchContext<'_>,
) -> Result<Vec<RawResult>, SearchError> {
    match provider {
        ProviderTag::DdgHtml => DdgHtmlAdapter.fetch(query, budget, ctx).await,
        ProviderTag::DdgLite => DdgLiteAdapter.fetch(query, budget, ctx).await,
        ProviderTag::DdgInstant => DdgInstantAdapter.fetch(query, budget, ctx).await,
        ProviderTag::Wikipedia => WikipediaAdapter.fetch(query, budget, ctx).await,
        ProviderTag::BingRss => BingRssAdapter.fetch(query, budget, ctx).await,
    }
}

/// Turn merged raw candidates into the final result list for `request`.
///
/// Every candidate is stamped with `now` as its retrieval time and scored
/// against it.
pub fn rank(raw: Vec<RawResult>, request: &SearchRequest, now: DateTime<Utc>) -> Vec<ScoredResult> {
    let normalized = raw.into_iter().map(|r| normalize(r, now)).collect();
    let deduped = deduplicate(normalized, &request.exclude_domains);

    let ctx = ScoringContext {
        recency_days: request.recency_days,
        trusted_domains: &request.trusted_domains,
        high_stakes: request.is_high_stakes(),
        now,
    };
    let mut scored: Vec<ScoredResult> = deduped
        .into_iter()
        .map(|group| score_result(group.result, group.engines.len(), &ctx))
        .collect();

    sort_by_score(&mut scored);
    let mut ranked = diversify(scored, MAX_PER_DOMAIN);
    ranked.truncate(request.max_results);
    ranked
}
