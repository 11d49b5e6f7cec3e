//! URL helpers for the crawl engine
//!
//! Authority extraction, same-authority comparison, and the admitted-scheme
//! test used by the admission gate.

use url::Url;

/// Extracts the authority of a URL: the lowercased host, plus the port when
/// one is explicitly present.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kumo::url::authority;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://example.com:8080/").unwrap();
/// assert_eq!(authority(&url), Some("example.com:8080".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host),
    }
}

/// Returns true when both URLs share an authority.
///
/// URLs without a host (e.g. `mailto:`) never match anything, including
/// each other.
pub fn same_authority(a: &Url, b: &Url) -> bool {
    match (authority(a), authority(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Returns true for the schemes the crawler admits: `http` and `https`.
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
