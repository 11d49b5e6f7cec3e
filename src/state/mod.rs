//! Shared crawl state
//!
//! `CrawlContext` holds the per-crawl state every worker sees: the root URL,
//! the configuration, the crawl clock, and the admission bookkeeping
//! (seen-set and per-domain counters).

mod context;

pub use context::{AdmissionOutcome, CrawlContext};
