use super::PageToCrawl;
use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use std::sync::OnceLock;
use url::Url;

/// Response metadata captured when the headers arrive, before any of the
/// body has been read.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    /// HTTP status code
    pub status: StatusCode,

    /// Response headers
    pub headers: HeaderMap,

    /// URL the response was served from, after any redirects
    pub final_url: Url,
}

impl ResponseSnapshot {
    /// The raw `Content-Type` header value, if one was sent and is valid
    /// ASCII.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }
}

/// The outcome of fetching a single page.
///
/// Extends the work item with results: response metadata (or none, when the
/// transport failed), the body actually read, and the measured body size.
#[derive(Debug)]
pub struct CrawledPage {
    /// The work item this page was fetched for
    pub page: PageToCrawl,

    /// Header-time response snapshot; `None` means no response was received
    pub response: Option<ResponseSnapshot>,

    /// Raw response body; empty when the download predicate denied the read
    /// or the transport failed
    pub body: Bytes,

    /// Transport error captured during the request, if any
    pub request_error: Option<String>,

    /// Number of body bytes actually read (not the `Content-Length` claim)
    pub page_size_in_bytes: u64,

    text: OnceLock<String>,
}

impl CrawledPage {
    /// Creates an empty result for a work item: no response, no body.
    pub fn new(page: PageToCrawl) -> Self {
        Self {
            page,
            response: None,
            body: Bytes::new(),
            request_error: None,
            page_size_in_bytes: 0,
            text: OnceLock::new(),
        }
    }

    /// Stores the downloaded body and records its measured size.
    pub fn set_body(&mut self, body: Bytes) {
        self.page_size_in_bytes = body.len() as u64;
        self.body = body;
        self.text = OnceLock::new();
    }

    /// The body decoded as text, materialized lazily on first use.
    pub fn text(&self) -> &str {
        self.text
            .get_or_init(|| String::from_utf8_lossy(&self.body).into_owned())
    }

    /// True when the body holds anything beyond whitespace.
    pub fn has_content(&self) -> bool {
        !self.text().trim().is_empty()
    }
}
