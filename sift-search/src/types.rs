//! Core types for candidate results, provider identification and ranking output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External sources that sift-search can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    /// DuckDuckGo HTML results page (`html.duckduckgo.com`).
    DdgHtml,
    /// DuckDuckGo lite results page (`lite.duckduckgo.com`).
    DdgLite,
    /// DuckDuckGo instant-answer JSON API.
    DdgInstant,
    /// Wikipedia full-text search API.
    Wikipedia,
    /// Bing results rendered as an RSS feed.
    BingRss,
}

impl ProviderTag {
    /// Returns the stable wire name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DdgHtml => "ddg_html",
            Self::DdgLite => "ddg_lite",
            Self::DdgInstant => "ddg_instant",
            Self::Wikipedia => "wikipedia",
            Self::BingRss => "bing_rss",
        }
    }

    /// Returns the ranking weight for results from this provider.
    ///
    /// Only a minor tiebreak signal: it contributes 5% of the composite score.
    pub fn weight(&self) -> f64 {
        match self {
            Self::DdgHtml => 0.25,
            Self::DdgLite => 0.2,
            Self::BingRss => 0.2,
            Self::DdgInstant => 0.15,
            Self::Wikipedia => 0.15,
        }
    }

    /// Whether this provider returns full web result pages.
    ///
    /// High-volume providers are asked for twice the final budget; the
    /// structured sources get roughly half of it.
    pub fn is_high_volume(&self) -> bool {
        matches!(self, Self::DdgHtml | Self::DdgLite | Self::BingRss)
    }

    /// Number of raw candidates to request for a final budget of `max_results`.
    pub fn candidate_budget(&self, max_results: usize) -> usize {
        if self.is_high_volume() {
            max_results * 2
        } else {
            max_results.div_ceil(2).max(2)
        }
    }

    /// Returns all provider variants.
    pub fn all() -> &'static [ProviderTag] {
        &[
            Self::DdgHtml,
            Self::DdgLite,
            Self::BingRss,
            Self::DdgInstant,
            Self::Wikipedia,
        ]
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One candidate as reported by a single provider, before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    /// Title as shown by the provider.
    pub title: String,
    /// URL as given by the provider (redirect wrappers already unwrapped).
    pub url: String,
    /// Text snippet, possibly empty.
    pub snippet: String,
    /// Which provider produced this candidate.
    pub source_engine: ProviderTag,
    /// Explicit publication time, when the provider reports one.
    pub published_at: Option<DateTime<Utc>>,
}

/// A [`RawResult`] with a canonical URL and derived domain.
///
/// Two normalised results with the same `url` are the same logical result
/// regardless of which provider reported them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub title: String,
    /// Canonical URL, the deduplication key.
    pub url: String,
    pub snippet: String,
    pub source_engine: ProviderTag,
    /// Registrable domain (last two host labels). Empty when the URL is malformed.
    pub domain: String,
    pub published_at: Option<DateTime<Utc>>,
    pub retrieved_at: DateTime<Utc>,
}

/// Discrete reliability label for citation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceQuality {
    High,
    Medium,
    Low,
}

impl fmt::Display for EvidenceQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// A ranked search result ready to be returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    pub title: String,
    /// Canonical URL.
    pub url: String,
    pub snippet: String,
    pub source_engine: ProviderTag,
    pub domain: String,
    pub published_at: Option<DateTime<Utc>>,
    pub retrieved_at: DateTime<Utc>,
    /// Recency signal in `[0, 1]`, rounded to three decimals.
    pub freshness_score: f64,
    /// Source reliability signal in `[0, 1]`, rounded to three decimals.
    pub trust_score: f64,
    /// Weighted composite in `[0, 1]`, rounded to three decimals.
    pub score: f64,
    pub evidence_quality: EvidenceQuality,
}
