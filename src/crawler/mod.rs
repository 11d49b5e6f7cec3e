//! Crawler module: the crawl engine and its collaborators
//!
//! - `engine`: the control loop (seed enqueue, dispatch, termination)
//! - `decision`: the admission and continuation gates
//! - `scheduler`: ordering of pending work
//! - `requester`: HTTP fetching with header-time download gating
//! - `worker_pool`: bounded-parallelism execution
//! - `events`: lifecycle notifications for embedders
//! - `extractor`: hyperlink extraction from fetched HTML

mod decision;
mod engine;
mod events;
mod extractor;
mod requester;
mod scheduler;
mod worker_pool;

pub use decision::{CrawlDecider, CrawlDecision, DecisionMaker};
pub use engine::{CrawlEngine, CrawlResult};
pub use events::{CrawlEvent, EventListener};
pub use extractor::{HtmlLinkExtractor, LinkExtractor};
pub use requester::{DownloadPredicate, HttpPageRequester, PageRequester};
pub use scheduler::{FifoScheduler, PageScheduler};
pub use worker_pool::WorkerPool;
