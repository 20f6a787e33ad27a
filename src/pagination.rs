//! Pagination via the `Link` response header
//!
//! GitHub signals continuation with `Link: <url>; rel="next", <url>;
//! rel="last"`. Only the `next` relation matters for walking: a page
//! without one is the final page.

use regex::Regex;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

#[allow(clippy::expect_used)]
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>;\s*rel="([^"]+)""#).expect("hardcoded regex"));

/// One decoded page of results plus its continuation indicator
#[derive(Debug)]
pub struct Page<T> {
    /// Items in the order the API returned them
    pub items: Vec<T>,
    /// URL of the next page, if the API signaled one
    pub next: Option<Url>,
}

/// Parse a `Link` header value into `rel -> url` pairs
pub fn parse_link_header(value: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();
    for part in value.split(',') {
        if let Some(caps) = LINK_RE.captures(part.trim()) {
            links.insert(caps[2].to_string(), caps[1].to_string());
        }
    }
    links
}

/// Extract the `rel="next"` URL from response headers, if present
///
/// A missing, unreadable, or unparsable link is treated as "no further
/// pages": the walker terminates rather than guessing a continuation.
pub fn next_url(headers: &HeaderMap) -> Option<Url> {
    let value = headers.get("link")?.to_str().ok()?;
    let links = parse_link_header(value);
    links.get("next").and_then(|raw| Url::parse(raw).ok())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const GITHUB_LINK: &str = concat!(
        r#"<https://api.github.com/repos/o/r/issues?page=2>; rel="next", "#,
        r#"<https://api.github.com/repos/o/r/issues?page=9>; rel="last""#
    );

    #[test]
    fn parses_all_relations() {
        let links = parse_link_header(GITHUB_LINK);
        assert_eq!(
            links["next"],
            "https://api.github.com/repos/o/r/issues?page=2"
        );
        assert_eq!(
            links["last"],
            "https://api.github.com/repos/o/r/issues?page=9"
        );
    }

    #[test]
    fn next_url_extracts_the_next_relation() {
        let mut headers = HeaderMap::new();
        headers.insert("link", HeaderValue::from_static(GITHUB_LINK));

        let next = next_url(&headers).unwrap();
        assert_eq!(next.query(), Some("page=2"));
    }

    #[test]
    fn missing_header_means_no_more_pages() {
        assert!(next_url(&HeaderMap::new()).is_none());
    }

    #[test]
    fn last_page_has_no_next_relation() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "link",
            HeaderValue::from_static(
                r#"<https://api.github.com/repos/o/r/issues?page=8>; rel="prev""#,
            ),
        );
        assert!(next_url(&headers).is_none());
    }

    #[test]
    fn malformed_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("link", HeaderValue::from_static("this is not a link header"));
        assert!(next_url(&headers).is_none());
    }

    #[test]
    fn unparsable_next_url_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "link",
            HeaderValue::from_static(r#"<not a url>; rel="next""#),
        );
        assert!(next_url(&headers).is_none());
    }
}
