use crate::url::same_authority;
use url::Url;

/// A unit of crawl work: one URL scheduled for fetching.
///
/// Ownership of a `PageToCrawl` transfers from the scheduler to a single
/// worker; it is consumed when the per-page pipeline ends.
#[derive(Debug, Clone)]
pub struct PageToCrawl {
    /// The URL to fetch
    pub url: Url,

    /// Root URL of the crawl (the seed)
    pub root_url: Url,

    /// The page this link was found on; the URL itself for the seed
    pub parent_url: Url,

    /// True iff the URL shares an authority with the root
    pub is_internal: bool,

    /// Reserved for retry scheduling; the engine never sets this
    pub is_retry: bool,
}

impl PageToCrawl {
    /// Creates a work item for a link discovered on `parent_url`.
    ///
    /// `is_internal` is computed here, at enqueue time, by comparing the
    /// URL's authority with the root's.
    pub fn new(url: Url, root_url: Url, parent_url: Url) -> Self {
        let is_internal = same_authority(&url, &root_url);
        Self {
            url,
            root_url,
            parent_url,
            is_internal,
            is_retry: false,
        }
    }

    /// Creates the seed work item: parent and root are the seed itself.
    pub fn seed(url: Url) -> Self {
        Self::new(url.clone(), url.clone(), url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_internal() {
        let page = PageToCrawl::seed(Url::parse("https://example.com/").unwrap());
        assert!(page.is_internal);
        assert!(!page.is_retry);
        assert_eq!(page.url, page.root_url);
        assert_eq!(page.url, page.parent_url);
    }

    #[test]
    fn test_same_host_link_is_internal() {
        let root = Url::parse("https://example.com/").unwrap();
        let page = PageToCrawl::new(
            Url::parse("https://example.com/about").unwrap(),
            root.clone(),
            root,
        );
        assert!(page.is_internal);
    }

    #[test]
    fn test_cross_host_link_is_external() {
        let root = Url::parse("https://example.com/").unwrap();
        let page = PageToCrawl::new(
            Url::parse("https://other.com/").unwrap(),
            root.clone(),
            root,
        );
        assert!(!page.is_internal);
    }

    #[test]
    fn test_different_port_is_external() {
        let root = Url::parse("http://example.com/").unwrap();
        let page = PageToCrawl::new(
            Url::parse("http://example.com:8080/").unwrap(),
            root.clone(),
            root,
        );
        assert!(!page.is_internal);
    }
}
