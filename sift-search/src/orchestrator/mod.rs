//! Search orchestrator: concurrent fan-out, normalisation, dedup, scoring,
//! ranking and domain diversification.
//!
//! This module queries every configured provider concurrently, canonicalises
//! URLs, merges duplicates, scores each candidate on independent signals and
//! returns a sorted, diversified, truncated result set.

pub mod dedup;
pub mod scoring;
pub mod search;
pub mod url_normalize;
