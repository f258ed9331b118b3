//! Caller-supplied search parameters and their validated form.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

use crate::error::SearchError;
use crate::orchestrator::scoring::is_high_stakes;
use crate::orchestrator::url_normalize::{domain_of, normalize_domain};

/// Results returned when the caller does not ask for a specific number.
pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Upper bound on results per request.
pub const MAX_RESULTS_LIMIT: usize = 10;
/// Locale used when none (or a blank one) is given.
pub const DEFAULT_LOCALE: &str = "en-US";
/// Freshness window used when none is given.
pub const DEFAULT_RECENCY_DAYS: u32 = 30;
/// Largest accepted freshness window (100 years).
const MAX_RECENCY_DAYS: u32 = 36_500;

/// Optional search parameters as received from a caller.
///
/// Numbers are accepted as JSON numbers of any shape; fractional values
/// are truncated and out-of-range values clamped when the request is built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub max_results: Option<f64>,
    pub locale: Option<String>,
    pub recency_days: Option<f64>,
    #[serde(deserialize_with = "null_as_empty")]
    pub trusted_domains: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub exclude_domains: Vec<String>,
}

/// An explicit `null` list is the same as an absent one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed, non-empty query text.
    pub query: String,
    /// Clamped to `[1, MAX_RESULTS_LIMIT]`.
    pub max_results: usize,
    pub locale: String,
    /// At least 1.
    pub recency_days: u32,
    /// Lower-cased registrable domains.
    pub trusted_domains: BTreeSet<String>,
    /// Lower-cased registrable domains.
    pub exclude_domains: BTreeSet<String>,
}

impl SearchRequest {
    /// Validate `query` and normalise `options`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] if the query is empty or blank.
    pub fn new(query: &str, options: SearchOptions) -> Result<Self, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::Validation("query is required".into()));
        }

        let max_results = clamp_count(
            options.max_results,
            DEFAULT_MAX_RESULTS as u32,
            MAX_RESULTS_LIMIT as u32,
        ) as usize;
        let recency_days = clamp_count(options.recency_days, DEFAULT_RECENCY_DAYS, MAX_RECENCY_DAYS);
        let locale = options
            .locale
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Ok(Self {
            query: query.to_string(),
            max_results,
            locale,
            recency_days,
            trusted_domains: domain_set(&options.trusted_domains),
            exclude_domains: domain_set(&options.exclude_domains),
        })
    }

    /// Whether the query touches a high-stakes topic.
    pub fn is_high_stakes(&self) -> bool {
        is_high_stakes(&self.query)
    }
}

/// Missing, zero or NaN means `default`; anything else is truncated and
/// clamped to `[1, max]`, so `0.4` becomes 1.
fn clamp_count(value: Option<f64>, default: u32, max: u32) -> u32 {
    match value {
        Some(v) if !v.is_nan() && v != 0.0 => v.trunc().clamp(1.0, f64::from(max)) as u32,
        _ => default,
    }
}

/// Registrable-domain set from caller input. Entries may be bare hosts or
/// full URLs; blanks are dropped.
fn domain_set(entries: &[String]) -> BTreeSet<String> {
    entries
        .iter()
        .map(|entry| {
            if entry.contains("://") {
                domain_of(entry)
            } else {
                normalize_domain(entry)
            }
        })
        .filter(|domain| !domain.is_empty())
        .collect()
}
