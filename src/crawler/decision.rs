//! Admission and continuation gates
//!
//! Three pure decisions drive the per-page pipeline: whether to crawl a
//! page at all, whether to download a response body once the headers are
//! in, and whether to extract links from a fetched page. Each decision is
//! fully determined by its inputs; no I/O, no state mutation. The reason
//! strings are a stable vocabulary consumed by embedders, so they change
//! only deliberately.

use crate::page::{CrawledPage, PageToCrawl};
use crate::state::{AdmissionOutcome, CrawlContext};
use crate::url::{authority, is_http_scheme};
use reqwest::StatusCode;

/// Content types whose bodies get downloaded.
const DOWNLOADABLE_CONTENT_TYPES: &[&str] = &["text/html"];

/// Outcome of a gate: whether the step may proceed and, when it may not,
/// why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlDecision {
    pub allowed: bool,
    pub reason: String,
}

impl CrawlDecision {
    /// An allowing decision; the reason is empty.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: String::new(),
        }
    }

    /// A denying decision with the given reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }

    /// The decision equivalent of a failed atomic admission, using the same
    /// reason vocabulary as the pure gate.
    pub fn from_denied_admission(outcome: AdmissionOutcome) -> Self {
        match outcome {
            AdmissionOutcome::Admitted => Self::allow(),
            AdmissionOutcome::AlreadySeen => deny_already_crawled(),
            AdmissionOutcome::PageCapReached { limit } => deny_page_cap(limit),
            AdmissionOutcome::DomainCapReached { limit, authority } => {
                deny_domain_cap(limit, &authority)
            }
        }
    }
}

fn deny_already_crawled() -> CrawlDecision {
    CrawlDecision::deny("Link already crawled")
}

fn deny_page_cap(limit: u64) -> CrawlDecision {
    CrawlDecision::deny(format!(
        "MaxPagesToCrawl limit of [{limit}] has been reached"
    ))
}

fn deny_domain_cap(limit: u64, authority: &str) -> CrawlDecision {
    CrawlDecision::deny(format!(
        "MaxPagesToCrawlPerDomain limit of [{limit}] has been reached for domain [{authority}]"
    ))
}

/// The decision protocol the engine consults at each gate.
///
/// Implementations must be pure so that decisions can be re-evaluated
/// freely; the engine may call a gate both before scheduling and while
/// enforcing admission under concurrency.
pub trait CrawlDecider: Send + Sync {
    /// Gate 1: may this page be fetched at all?
    fn should_crawl_page(
        &self,
        page: Option<&PageToCrawl>,
        context: Option<&CrawlContext>,
    ) -> CrawlDecision;

    /// Gate 2: may the response body be downloaded? Called during the
    /// request, after the headers arrive and before any body is read.
    fn should_download_page_content(
        &self,
        crawled: Option<&CrawledPage>,
        context: Option<&CrawlContext>,
    ) -> CrawlDecision;

    /// Gate 3: may links be extracted from this fetched page?
    fn should_crawl_page_links(
        &self,
        crawled: Option<&CrawledPage>,
        context: Option<&CrawlContext>,
    ) -> CrawlDecision;
}

/// The default rule set. Rules are evaluated in a fixed order; the first
/// failing rule wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecisionMaker;

impl CrawlDecider for DecisionMaker {
    fn should_crawl_page(
        &self,
        page: Option<&PageToCrawl>,
        context: Option<&CrawlContext>,
    ) -> CrawlDecision {
        let Some(page) = page else {
            return CrawlDecision::deny("Null page to crawl");
        };
        let Some(context) = context else {
            return CrawlDecision::deny("Null crawl context");
        };

        if !is_http_scheme(&page.url) {
            return CrawlDecision::deny("Scheme does not begin with http");
        }

        if context.is_seen(&page.url) {
            return deny_already_crawled();
        }

        // No zero-means-unlimited sentinel on either cap: a cap of 0 admits
        // nothing.
        let page_limit = context.config.max_pages_to_crawl;
        if context.pages_crawled() + 1 > page_limit {
            return deny_page_cap(page_limit);
        }

        let timeout = context.config.crawl_timeout_seconds;
        if timeout > 0 && context.elapsed().as_secs() >= timeout {
            return CrawlDecision::deny(format!(
                "Crawl timeout of [{timeout}] seconds has been reached"
            ));
        }

        if !page.is_internal && !context.config.is_external_page_crawling_enabled {
            return CrawlDecision::deny("Link is external");
        }

        let domain_limit = context.config.max_pages_to_crawl_per_domain;
        if let Some(auth) = authority(&page.url) {
            if context.domain_count(&auth) >= domain_limit {
                return deny_domain_cap(domain_limit, &auth);
            }
        }

        CrawlDecision::allow()
    }

    fn should_download_page_content(
        &self,
        crawled: Option<&CrawledPage>,
        context: Option<&CrawlContext>,
    ) -> CrawlDecision {
        let Some(crawled) = crawled else {
            return CrawlDecision::deny("Null crawled page");
        };
        if context.is_none() {
            return CrawlDecision::deny("Null crawl context");
        }

        let Some(response) = crawled.response.as_ref() else {
            return CrawlDecision::deny("Null HttpWebResponse");
        };

        if response.status != StatusCode::OK {
            return CrawlDecision::deny("HttpStatusCode is not 200");
        }

        let content_type = response.content_type().unwrap_or("");
        if !is_downloadable_content_type(content_type) {
            return CrawlDecision::deny(format!(
                "Content type is not any of the following: {}",
                DOWNLOADABLE_CONTENT_TYPES.join(", ")
            ));
        }

        CrawlDecision::allow()
    }

    fn should_crawl_page_links(
        &self,
        crawled: Option<&CrawledPage>,
        context: Option<&CrawlContext>,
    ) -> CrawlDecision {
        let Some(crawled) = crawled else {
            return CrawlDecision::deny("Null crawled page");
        };
        let Some(context) = context else {
            return CrawlDecision::deny("Null crawl context");
        };

        if !crawled.has_content() {
            return CrawlDecision::deny("Page has no content");
        }

        if !crawled.page.is_internal && !context.config.is_external_page_links_crawling_enabled {
            return CrawlDecision::deny("Link is external");
        }

        CrawlDecision::allow()
    }
}

/// Case-insensitive prefix match on the bare media type; parameters such as
/// `; charset=utf-8` are ignored.
fn is_downloadable_content_type(value: &str) -> bool {
    let media_type = value
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    DOWNLOADABLE_CONTENT_TYPES
        .iter()
        .any(|allowed| media_type.starts_with(allowed))
}
