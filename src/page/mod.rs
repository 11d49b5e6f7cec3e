//! Crawl data model
//!
//! `PageToCrawl` is the unit of work that moves from the scheduler to a
//! worker; `CrawledPage` is what a worker produces from it: response
//! metadata, body bytes, and any transport error.

mod crawled;
mod to_crawl;

pub use crawled::{CrawledPage, ResponseSnapshot};
pub use to_crawl::PageToCrawl;
