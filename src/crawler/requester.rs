//! HTTP page requests with header-time download gating
//!
//! The requester couples one GET with a caller-supplied predicate: the
//! response headers are inspected first, and only when the predicate allows
//! it is the body drained. Transport failures become data on the returned
//! page, never errors.

use crate::config::CrawlConfig;
use crate::crawler::decision::CrawlDecision;
use crate::page::{CrawledPage, PageToCrawl, ResponseSnapshot};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;

/// Predicate consulted once response headers are available, before any body
/// is read. Must be fast and side-effect free.
pub type DownloadPredicate<'a> = &'a (dyn Fn(&CrawledPage) -> CrawlDecision + Send + Sync);

/// Executes page fetches for the engine.
#[async_trait]
pub trait PageRequester: Send + Sync {
    /// Fetches `url` and returns a `CrawledPage` on every path: transport
    /// failures are captured on the page, and the predicate decides from
    /// the header-time view whether the body gets downloaded.
    async fn make_request(
        &self,
        url: &Url,
        should_download_content: DownloadPredicate<'_>,
    ) -> CrawledPage;
}

/// reqwest-backed requester.
pub struct HttpPageRequester {
    client: Client,
}

impl HttpPageRequester {
    /// Builds the HTTP client: configured User-Agent, request and connect
    /// timeouts, compressed transfer, and a bounded redirect chain.
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent_string.clone())
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageRequester for HttpPageRequester {
    async fn make_request(
        &self,
        url: &Url,
        should_download_content: DownloadPredicate<'_>,
    ) -> CrawledPage {
        let mut crawled = CrawledPage::new(PageToCrawl::seed(url.clone()));

        // send() resolves once the headers arrive; the body stream stays
        // untouched until bytes() is called.
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                crawled.request_error = Some(classify_transport_error(&err));
                return crawled;
            }
        };

        crawled.response = Some(ResponseSnapshot {
            status: response.status(),
            headers: response.headers().clone(),
            final_url: response.url().clone(),
        });

        let verdict = should_download_content(&crawled);
        if !verdict.allowed {
            tracing::debug!("skipping body of {url}: {}", verdict.reason);
            // Dropping the response closes it without reading the body.
            drop(response);
            return crawled;
        }

        match response.bytes().await {
            Ok(body) => crawled.set_body(body),
            Err(err) => {
                crawled.request_error = Some(format!("Body read failed: {err}"));
            }
        }

        crawled
    }
}

fn classify_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timeout".to_string()
    } else if err.is_connect() {
        "Connection refused".to_string()
    } else {
        err.to_string()
    }
}
