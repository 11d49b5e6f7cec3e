//! Hyperlink extraction from fetched HTML

use scraper::{Html, Selector};
use url::Url;

/// Extracts outbound links from an HTML document.
///
/// Implementations must be pure: the same document and base URL always
/// yield the same links. The engine supplies the base URL for resolving
/// relative references.
pub trait LinkExtractor: Send + Sync {
    fn get_links(&self, base_url: &Url, html: &str) -> Vec<Url>;
}

/// Default extractor: anchor tags, resolved against the base URL.
///
/// Anchors carrying a `download` attribute, fragment-only references, and
/// anything that does not resolve to an http(s) URL (`javascript:`,
/// `mailto:`, `tel:`, `data:`, and friends) are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn get_links(&self, base_url: &Url, html: &str) -> Vec<Url> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter(|element| element.value().attr("download").is_none())
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_href(href, base_url))
            .collect()
    }
}

fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let resolved = base_url.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/section/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        HtmlLinkExtractor
            .get_links(&base(), html)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_absolute_link() {
        let found = links(r#"<a href="https://other.com/page">x</a>"#);
        assert_eq!(found, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let found = links(r#"<a href="/top">x</a><a href="sibling">y</a>"#);
        assert_eq!(
            found,
            vec![
                "https://example.com/top",
                "https://example.com/section/sibling"
            ]
        );
    }

    #[test]
    fn test_non_http_schemes_skipped() {
        let html = r#"
            <a href="javascript:void(0)">a</a>
            <a href="mailto:u@example.com">b</a>
            <a href="tel:+1234567890">c</a>
            <a href="data:text/html,<h1>x</h1>">d</a>
        "#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_fragment_only_skipped() {
        assert!(links(r##"<a href="#section">x</a>"##).is_empty());
    }

    #[test]
    fn test_download_links_skipped() {
        assert!(links(r#"<a href="/file.pdf" download>x</a>"#).is_empty());
    }

    #[test]
    fn test_mixed_document() {
        let html = r#"
            <html><body>
              <a href="/keep-1">k1</a>
              <a href="mailto:no@example.com">drop</a>
              <a href="/keep-2">k2</a>
            </body></html>
        "#;
        let found = links(html);
        assert_eq!(
            found,
            vec!["https://example.com/keep-1", "https://example.com/keep-2"]
        );
    }

    #[test]
    fn test_extraction_is_pure() {
        let html = r#"<a href="/a">a</a><a href="/b">b</a>"#;
        assert_eq!(links(html), links(html));
    }
}
