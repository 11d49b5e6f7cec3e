use serde::Deserialize;

/// Crawl behavior configuration: the recognized options of the engine.
///
/// Cap sentinels are asymmetric on purpose: a `crawl-timeout-seconds` of 0
/// disables the timeout, while a `max-pages-to-crawl` or
/// `max-pages-to-crawl-per-domain` of 0 is a cap of zero and admits nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Hard cap on admitted pages
    #[serde(rename = "max-pages-to-crawl")]
    pub max_pages_to_crawl: u64,

    /// Per-authority cap on admitted pages
    #[serde(rename = "max-pages-to-crawl-per-domain")]
    pub max_pages_to_crawl_per_domain: u64,

    /// Wall-clock budget in seconds from crawl start; 0 disables it
    #[serde(rename = "crawl-timeout-seconds")]
    pub crawl_timeout_seconds: u64,

    /// Worker pool width
    #[serde(rename = "max-concurrent-threads")]
    pub max_concurrent_threads: usize,

    /// Admit pages whose authority differs from the root's
    #[serde(rename = "external-page-crawling-enabled")]
    pub is_external_page_crawling_enabled: bool,

    /// Parse links out of pages whose authority differs from the root's
    #[serde(rename = "external-page-links-crawling-enabled")]
    pub is_external_page_links_crawling_enabled: bool,

    /// Value sent as the User-Agent request header
    #[serde(rename = "user-agent")]
    pub user_agent_string: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages_to_crawl: 1000,
            max_pages_to_crawl_per_domain: 1000,
            crawl_timeout_seconds: 0,
            max_concurrent_threads: 10,
            is_external_page_crawling_enabled: false,
            is_external_page_links_crawling_enabled: false,
            user_agent_string: format!(
                "kumo/{} (+https://github.com/kumo-crawler/kumo)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}
