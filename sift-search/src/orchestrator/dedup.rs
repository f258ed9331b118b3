//! Result deduplication by canonical URL, and per-domain diversification.
//!
//! Groups normalised results that refer to the same page and keeps the
//! most informative variant per URL. Tracks which providers contributed
//! each URL so that the scorer can reward agreement.

use std::collections::{BTreeSet, HashMap};

use crate::types::{NormalizedResult, ProviderTag, ScoredResult};

/// Maximum results per domain before the rest overflow to the tail.
pub const MAX_PER_DOMAIN: usize = 2;

/// A normalised result after deduplication, enriched with the set of
/// providers that returned the same URL.
#[derive(Debug, Clone)]
pub struct DeduplicatedResult {
    /// The kept variant for this URL (longest snippet).
    pub result: NormalizedResult,
    /// All distinct providers that returned this URL, in first-seen order.
    pub engines: Vec<ProviderTag>,
}

/// Deduplicate normalised results by canonical URL.
///
/// Results without a domain, or whose domain is in `exclude`, are dropped.
/// Among duplicates the variant with the strictly longer snippet wins, so
/// ties keep the first one seen. Output follows first-seen order.
pub fn deduplicate(
    results: Vec<NormalizedResult>,
    exclude: &BTreeSet<String>,
) -> Vec<DeduplicatedResult> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DeduplicatedResult> = Vec::new();

    for result in results {
        if result.domain.is_empty() || exclude.contains(&result.domain) {
            continue;
        }

        match index.get(&result.url) {
            Some(&i) => {
                let group = &mut groups[i];
                if !group.engines.contains(&result.source_engine) {
                    group.engines.push(result.source_engine);
                }
                if result.snippet.chars().count() > group.result.snippet.chars().count() {
                    group.result = result;
                }
            }
            None => {
                index.insert(result.url.clone(), groups.len());
                groups.push(DeduplicatedResult {
                    engines: vec![result.source_engine],
                    result,
                });
            }
        }
    }

    groups
}

/// Sort by score, highest first. The sort is stable, so equal scores keep
/// their input order.
pub fn sort_by_score(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Apply the per-domain cap to a ranked list.
///
/// The first `max_per_domain` results of each domain form the primary
/// list; later results from an already-capped domain are moved, in order,
/// to an overflow list appended after it. Nothing is discarded.
pub fn diversify(ranked: Vec<ScoredResult>, max_per_domain: usize) -> Vec<ScoredResult> {
    let mut per_domain: HashMap<String, usize> = HashMap::new();
    let mut primary = Vec::with_capacity(ranked.len());
    let mut overflow = Vec::new();

    for result in ranked {
        let seen = per_domain.entry(result.domain.clone()).or_insert(0);
        if *seen < max_per_domain {
            *seen += 1;
            primary.push(result);
        } else {
            overflow.push(result);
        }
    }

    primary.extend(overflow);
    primary
}
