//! URL canonicalisation and domain derivation.
//!
//! Canonical URLs are the deduplication key: equivalent pages that differ
//! only in tracking parameters, fragments or a trailing slash compare equal.
//!
//! Domains are approximated as the last two labels of the host. Hosts under
//! multi-label public suffixes (`example.co.uk` becomes `co.uk`) collapse
//! together; this is accepted, since the domain only feeds trust tiers and
//! the per-domain diversity cap.

use chrono::{DateTime, Utc};
use url::{Host, Url};

use crate::engines::text::compact_ws;
use crate::types::{NormalizedResult, RawResult};

/// Tracking query parameters that are stripped during canonicalisation.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
];

/// Canonicalise a URL for deduplication.
///
/// 1. Remove the fragment.
/// 2. Remove known tracking parameters (UTM, fbclid, gclid) and
///    re-serialise the remaining query in form-encoded order.
/// 3. Strip trailing slashes from the path; a root path stays `/`.
///
/// Scheme and host are lower-cased and default ports dropped by the parser.
/// If the input cannot be parsed, the trimmed input is returned. The
/// function is idempotent.
///
/// # Examples
///
/// ```
/// use sift_search::orchestrator::url_normalize::canonicalize;
///
/// let a = canonicalize("https://Example.COM/path/?q=1&utm_source=x#section");
/// assert_eq!(a, "https://example.com/path?q=1");
/// assert_eq!(canonicalize(&a), a);
/// ```
pub fn canonicalize(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw.trim()) else {
        return raw.trim().to_string();
    };

    parsed.set_fragment(None);

    // The query is always re-serialised so that equivalent encodings
    // (`%20` and `+`, bare keys, `~`) share one canonical form.
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }

    if !parsed.cannot_be_a_base() {
        let path = parsed.path();
        let trimmed = path.trim_end_matches('/');
        if trimmed.len() != path.len() {
            let normalized = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
            parsed.set_path(&normalized);
        }
    }

    parsed.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key.to_ascii_lowercase().as_str())
}

/// Registrable domain of `url`: the lower-cased host reduced to its last
/// two labels. IP hosts are returned as-is. Malformed URLs yield `""`.
pub fn domain_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return String::new();
    };
    match parsed.host() {
        Some(Host::Domain(host)) => normalize_domain(host),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => String::new(),
    }
}

/// Reduce a host name (or caller-supplied domain) to its last two
/// dot-separated labels, lower-cased.
pub fn normalize_domain(host: &str) -> String {
    let lowered = host.trim().to_lowercase();
    let labels: Vec<&str> = lowered.split('.').filter(|l| !l.is_empty()).collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Normalise a provider candidate: canonical URL, derived domain, cleaned
/// title/snippet and retrieval time. An empty title becomes the URL.
pub fn normalize(raw: RawResult, retrieved_at: DateTime<Utc>) -> NormalizedResult {
    let url = canonicalize(&raw.url);
    let domain = domain_of(&url);
    let title = compact_ws(&raw.title);
    NormalizedResult {
        title: if title.is_empty() { url.clone() } else { title },
        snippet: compact_ws(&raw.snippet),
        url,
        source_engine: raw.source_engine,
        domain,
        published_at: raw.published_at,
        retrieved_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderTag;

    #[test]
    fn lowercases_scheme_and_host() {
        assert_eq!(
            canonicalize("HTTPS://Example.COM/Path"),
            "https://example.com/Path"
        );
    }

    #[test]
    fn removes_trailing_slash() {
        assert_eq!(
            canonicalize("https://example.com/path/"),
            "https://example.com/path"
        );
        assert_eq!(
            canonicalize("https://example.com/path///"),
            "https://example.com/path"
        );
    }

    #[test]
    fn preserves_root_slash() {
        assert_eq!(canonicalize("https://example.com/"), "https://example.com/");
        assert_eq!(canonicalize("https://example.com"), "https://example.com/");
        assert_eq!(canonicalize("https://example.com//"), "https://example.com/");
    }

    #[test]
    fn removes_default_ports() {
        assert_eq!(
            canonicalize("http://example.com:80/path"),
            "http://example.com/path"
        );
        assert_eq!(
            canonicalize("https://example.com:443/path"),
            "https://example.com/path"
        );
        assert_eq!(
            canonicalize("https://example.com:8080/path"),
            "https://example.com:8080/path"
        );
    }

    #[test]
    fn removes_tracking_params() {
        assert_eq!(
            canonicalize("https://example.com/page?q=rust&utm_source=google&fbclid=abc&gclid=xyz"),
            "https://example.com/page?q=rust"
        );
    }

    #[test]
    fn tracking_param_matches_tracking_free_url() {
        assert_eq!(
            canonicalize("https://example.com/a?utm_source=x"),
            canonicalize("https://example.com/a")
        );
    }

    #[test]
    fn other_params_encoded_the_same_with_or_without_tracking() {
        let pairs = [
            ("https://x.com/p?q=a%20b&utm_source=x", "https://x.com/p?q=a%20b"),
            ("https://x.com/p?flag&utm_medium=mail", "https://x.com/p?flag"),
            ("https://x.com/p?v=a~b&gclid=1", "https://x.com/p?v=a~b"),
            ("https://x.com/p?utm_term=t&q=a+b", "https://x.com/p?q=a b"),
        ];
        for (tracked, clean) in pairs {
            assert_eq!(canonicalize(tracked), canonicalize(clean), "{tracked} vs {clean}");
        }
        assert_eq!(canonicalize("https://x.com/p?q=a%20b"), "https://x.com/p?q=a+b");
    }

    #[test]
    fn tracking_keys_matched_case_insensitively() {
        assert_eq!(
            canonicalize("https://example.com/page?UTM_Source=x&id=3"),
            "https://example.com/page?id=3"
        );
    }

    #[test]
    fn non_tracking_params_keep_order() {
        assert_eq!(
            canonicalize("https://example.com/search?z=1&a=2"),
            "https://example.com/search?z=1&a=2"
        );
    }

    #[test]
    fn removes_fragment_and_empty_query() {
        assert_eq!(
            canonicalize("https://example.com/page#section"),
            "https://example.com/page"
        );
        assert_eq!(canonicalize("https://example.com/page?"), "https://example.com/page");
    }

    #[test]
    fn invalid_url_returned_trimmed() {
        assert_eq!(canonicalize("  not a url at all "), "not a url at all");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let inputs = [
            "https://Example.COM/path/?b=2&a=1#section",
            "https://example.com/search?q=hello+world&utm_medium=mail&lang=en",
            "https://example.com/a%20b/?x=%26y",
            "https://example.com//",
            "mailto:someone@example.com",
            "not a url",
            "https://example.com/?utm_campaign=spring",
            "https://example.com/p?flag&v=a~b&q=a%20b",
        ];
        for input in inputs {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn domain_reduces_to_last_two_labels() {
        assert_eq!(domain_of("https://docs.python.org/3/"), "python.org");
        assert_eq!(domain_of("https://en.wikipedia.org/wiki/Rust"), "wikipedia.org");
        assert_eq!(domain_of("https://EXAMPLE.com"), "example.com");
    }

    #[test]
    fn multi_label_suffix_collapses() {
        assert_eq!(domain_of("https://www.bbc.co.uk/news"), "co.uk");
    }

    #[test]
    fn malformed_url_has_empty_domain() {
        assert_eq!(domain_of("not a url"), "");
        assert_eq!(domain_of("mailto:someone@example.com"), "");
    }

    #[test]
    fn ip_hosts_kept_whole() {
        assert_eq!(domain_of("http://192.168.1.20:8080/"), "192.168.1.20");
    }

    #[test]
    fn normalize_domain_handles_caller_input() {
        assert_eq!(normalize_domain(" Docs.Python.org "), "python.org");
        assert_eq!(normalize_domain("example.com."), "example.com");
        assert_eq!(normalize_domain("localhost"), "localhost");
        assert_eq!(normalize_domain(""), "");
    }

    #[test]
    fn normalize_builds_canonical_result() {
        let now = Utc::now();
        let raw = RawResult {
            title: "  Example \n Page ".into(),
            url: "https://Example.com/page/?utm_source=feed".into(),
            snippet: "  some   text ".into(),
            source_engine: ProviderTag::DdgHtml,
            published_at: None,
        };
        let normalized = normalize(raw, now);
        assert_eq!(normalized.url, "https://example.com/page");
        assert_eq!(normalized.domain, "example.com");
        assert_eq!(normalized.title, "Example Page");
        assert_eq!(normalized.snippet, "some text");
        assert_eq!(normalized.retrieved_at, now);
    }

    #[test]
    fn normalize_falls_back_to_url_for_title() {
        let raw = RawResult {
            title: "   ".into(),
            url: "https://example.com/a".into(),
            snippet: String::new(),
            source_engine: ProviderTag::BingRss,
            published_at: None,
        };
        assert_eq!(normalize(raw, Utc::now()).title, "https://example.com/a");
    }
}
