//! Text and link helpers shared by the provider parsers.

use scraper::Html;
use url::Url;

/// DuckDuckGo's redirect parameter carrying the real destination.
const REDIRECT_PARAM: &str = "uddg";

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the visible text of an HTML fragment (tags dropped, entities decoded).
pub(crate) fn fragment_text(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return compact_ws(html);
    }
    let fragment = Html::parse_fragment(html);
    compact_ws(&fragment.root_element().text().collect::<String>())
}

/// Decode the XML/HTML entities that appear in feed payloads and strip a
/// surrounding CDATA section.
pub(crate) fn decode_entities(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_start_matches("<![CDATA[")
        .trim_end_matches("]]>");

    let mut out = String::with_capacity(trimmed.len());
    let mut rest = trimmed;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|&end| end <= 10) {
            Some(end) => match decode_entity(&tail[1..end]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Whether `value` parses as an absolute `http`/`https` URL.
pub(crate) fn is_http_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Resolve a result link to its real destination.
///
/// Protocol-relative links are treated as `https`. Links wrapped in the
/// provider's redirect (`...?uddg=<encoded target>`) are unwrapped. Returns
/// `None` unless the final URL is an absolute `http(s)` URL.
pub(crate) fn resolve_result_link(href: &str) -> Option<String> {
    let href = href.trim();
    let full_href = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full_href).ok()?;
    let target = parsed
        .query_pairs()
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or(full_href);

    is_http_url(&target).then_some(target)
}

/// Truncate to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
