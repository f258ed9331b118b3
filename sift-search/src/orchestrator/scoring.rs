//! Multi-signal scoring for deduplicated results.
//!
//! Every candidate gets independent signals, each in `[0, 1]`:
//!
//! - **trust**: domain tier, caller-trusted domains, high-stakes tightening
//! - **freshness**: age of an explicit or inferred publication date
//! - **specificity**: snippet word count
//! - **provider weight**: fixed per provider
//! - **agreement**: how many distinct providers reported the same URL
//!
//! ```text
//! score = trust * 0.45 + freshness * 0.25 + specificity * 0.15
//!       + provider_weight * 0.05 + agreement * 0.10
//! ```
//!
//! The weights sum to 1, so the composite also lies in `[0, 1]`.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{EvidenceQuality, NormalizedResult, ScoredResult};

const TRUST_WEIGHT: f64 = 0.45;
const FRESHNESS_WEIGHT: f64 = 0.25;
const SPECIFICITY_WEIGHT: f64 = 0.15;
const PROVIDER_WEIGHT: f64 = 0.05;
const AGREEMENT_WEIGHT: f64 = 0.10;

/// Curated very-high-trust registrable domains.
const HIGH_TRUST_DOMAINS: &[&str] = &[
    "nih.gov",
    "cdc.gov",
    "who.int",
    "nasa.gov",
    "fda.gov",
    "sec.gov",
    "python.org",
    "mozilla.org",
    "nodejs.org",
    "openai.com",
    "cloudflare.com",
    "ietf.org",
    "iso.org",
    "arxiv.org",
    "nature.com",
    "science.org",
    "github.com",
];

/// The encyclopedic domain, trusted less than curated institutional sources.
const ENCYCLOPEDIA_DOMAIN: &str = "wikipedia.org";

/// Query substrings that mark a medical, legal, financial or security topic.
const HIGH_STAKES_KEYWORDS: &[&str] = &[
    "medical",
    "medicine",
    "drug",
    "dosage",
    "law",
    "legal",
    "tax",
    "financial",
    "investment",
    "security",
    "vulnerability",
    "cvss",
    "cve",
];

/// Freshness when no date signal exists at all.
const NO_DATE_FRESHNESS: f64 = 0.35;

/// Inferred year tokens outside this range are ignored.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1990..=2100;

/// Request-wide inputs to scoring.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Freshness window in days.
    pub recency_days: u32,
    /// Caller-trusted registrable domains (lower-cased).
    pub trusted_domains: &'a BTreeSet<String>,
    /// Whether the query touches a high-stakes topic.
    pub high_stakes: bool,
    /// Reference time for age calculations.
    pub now: DateTime<Utc>,
}

/// Whether `query` touches a medical, legal, tax/financial or security topic.
pub fn is_high_stakes(query: &str) -> bool {
    let q = query.to_lowercase();
    HIGH_STAKES_KEYWORDS.iter().any(|kw| q.contains(kw))
}

/// Source reliability for `domain`.
///
/// High-stakes queries only tighten the generic `.org`/`.com` tiers.
pub fn trust_score(domain: &str, trusted: &BTreeSet<String>, high_stakes: bool) -> f64 {
    if domain.is_empty() {
        return 0.2;
    }
    if trusted.contains(domain) {
        return 1.0;
    }
    if domain == ENCYCLOPEDIA_DOMAIN {
        return 0.78;
    }
    if HIGH_TRUST_DOMAINS.contains(&domain) {
        return 0.92;
    }
    if domain.ends_with(".gov") || domain.ends_with(".edu") {
        return 0.9;
    }
    if domain.ends_with(".org") {
        return if high_stakes { 0.7 } else { 0.75 };
    }
    if domain.ends_with(".com") {
        return if high_stakes { 0.45 } else { 0.55 };
    }
    0.5
}

/// Publication date of `result`: the explicit value if present, otherwise
/// January 1 of the latest plausible year mentioned in the title or snippet.
pub fn infer_published_date(result: &NormalizedResult) -> Option<DateTime<Utc>> {
    if let Some(published) = result.published_at {
        return Some(published);
    }
    let latest = year_tokens(&result.title)
        .chain(year_tokens(&result.snippet))
        .max()?;
    NaiveDate::from_ymd_opt(latest, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Four-digit standalone numbers within [`YEAR_RANGE`].
fn year_tokens(text: &str) -> impl Iterator<Item = i32> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| token.parse::<i32>().ok())
        .filter(|year| YEAR_RANGE.contains(year))
}

/// Recency of `result` relative to a window of `recency_days`.
pub fn freshness_score(result: &NormalizedResult, recency_days: u32, now: DateTime<Utc>) -> f64 {
    let Some(published) = infer_published_date(result) else {
        return NO_DATE_FRESHNESS;
    };
    let age_days = ((now - published).num_seconds() as f64 / 86_400.0).max(0.0);
    let window = f64::from(recency_days.max(1));
    if age_days <= window {
        1.0
    } else if age_days <= window * 2.0 {
        0.75
    } else if age_days <= window * 6.0 {
        0.5
    } else {
        0.25
    }
}

/// Snippet informativeness by word count.
pub fn specificity_score(snippet: &str) -> f64 {
    match snippet.split_whitespace().count() {
        0 => 0.2,
        n if n >= 20 => 1.0,
        n if n >= 12 => 0.75,
        n if n >= 6 => 0.5,
        _ => 0.35,
    }
}

/// Corroboration bonus for a URL reported by `providers` distinct providers.
pub fn agreement_score(providers: usize) -> f64 {
    (providers.saturating_sub(1) as f64 * 0.3).min(1.0)
}

/// Discrete quality label. Never `High` unless score, trust and freshness
/// all clear their thresholds.
pub fn evidence_quality(score: f64, trust: f64, freshness: f64) -> EvidenceQuality {
    if score >= 0.78 && trust >= 0.8 && freshness >= 0.6 {
        EvidenceQuality::High
    } else if score >= 0.55 {
        EvidenceQuality::Medium
    } else {
        EvidenceQuality::Low
    }
}

/// Score a deduplicated result reported by `providers` distinct providers.
pub fn score_result(
    result: NormalizedResult,
    providers: usize,
    ctx: &ScoringContext<'_>,
) -> ScoredResult {
    let trust = trust_score(&result.domain, ctx.trusted_domains, ctx.high_stakes);
    let freshness = freshness_score(&result, ctx.recency_days, ctx.now);
    let specificity = specificity_score(&result.snippet);
    let provider_weight = result.source_engine.weight();
    let agreement = agreement_score(providers);

    let score = (trust * TRUST_WEIGHT
        + freshness * FRESHNESS_WEIGHT
        + specificity * SPECIFICITY_WEIGHT
        + provider_weight * PROVIDER_WEIGHT
        + agreement * AGREEMENT_WEIGHT)
        .clamp(0.0, 1.0);

    ScoredResult {
        evidence_quality: evidence_quality(score, trust, freshness),
        freshness_score: round3(freshness),
        trust_score: round3(trust),
        score: round3(score),
        title: result.title,
        url: result.url,
        snippet: result.snippet,
        source_engine: result.source_engine,
        domain: result.domain,
        published_at: result.published_at,
        retrieved_at: result.retrieved_at,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
