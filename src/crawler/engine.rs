//! The crawl control loop
//!
//! One engine task drives the crawl: it drains the scheduler, hands each
//! dequeued page to the worker pool, and terminates once the queue is empty
//! and no work is in flight. Workers run the per-page pipeline: admission
//! gate, fetch, completion event, link gate, link enqueue.

use crate::config::CrawlConfig;
use crate::crawler::decision::{CrawlDecider, CrawlDecision, DecisionMaker};
use crate::crawler::events::{CrawlEvent, EventDispatcher, EventListener};
use crate::crawler::extractor::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::requester::{HttpPageRequester, PageRequester};
use crate::crawler::scheduler::{FifoScheduler, PageScheduler};
use crate::crawler::worker_pool::WorkerPool;
use crate::page::{CrawledPage, PageToCrawl};
use crate::state::{AdmissionOutcome, CrawlContext};
use crate::KumoError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Upper bound on how long the control loop waits before re-checking an
/// empty queue while workers are still in flight. Worker completions wake
/// it earlier.
const EMPTY_QUEUE_BACKOFF: Duration = Duration::from_millis(2500);

/// Summary of a finished crawl.
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Root URL the crawl started from
    pub root_url: Url,

    /// Wall-clock duration from seed enqueue to termination
    pub elapsed: Duration,

    /// Number of pages admitted over the crawl
    pub pages_crawled: u64,
}

/// The crawl engine: wires the scheduler, worker pool, decision gates and
/// page requester into the crawl control loop.
pub struct CrawlEngine {
    config: CrawlConfig,
    scheduler: Arc<dyn PageScheduler>,
    requester: Arc<dyn PageRequester>,
    decider: Arc<dyn CrawlDecider>,
    extractor: Arc<dyn LinkExtractor>,
    listeners: Vec<EventListener>,
}

impl CrawlEngine {
    /// Builds an engine with the default collaborators: FIFO scheduling,
    /// the standard rule set, a reqwest requester, and the scraper-backed
    /// link extractor.
    pub fn new(config: CrawlConfig) -> Result<Self, KumoError> {
        let requester = Arc::new(HttpPageRequester::new(&config)?);
        Ok(Self::with_collaborators(
            config,
            Arc::new(FifoScheduler::new()),
            requester,
            Arc::new(DecisionMaker),
            Arc::new(HtmlLinkExtractor),
        ))
    }

    /// Builds an engine from explicit collaborators. Embedders use this to
    /// swap scheduling order, decision policy, transport or extraction.
    pub fn with_collaborators(
        config: CrawlConfig,
        scheduler: Arc<dyn PageScheduler>,
        requester: Arc<dyn PageRequester>,
        decider: Arc<dyn CrawlDecider>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        Self {
            config,
            scheduler,
            requester,
            decider,
            extractor,
            listeners: Vec::new(),
        }
    }

    /// Registers a lifecycle-event listener.
    ///
    /// Listeners run off the worker path, in per-page emission order; a
    /// panicking listener is logged and cannot affect the crawl.
    pub fn on_event(&mut self, listener: impl Fn(&CrawlEvent) + Send + Sync + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    /// Crawls from `seed`, returning when no admitted work remains.
    ///
    /// Every event for the crawl has been delivered to listeners by the
    /// time this returns.
    ///
    /// # Errors
    ///
    /// Returns an argument error when the seed is empty or unparseable. A
    /// seed that parses but is not crawlable (wrong scheme, external rules)
    /// is surfaced as a `PageCrawlDisallowed` event instead.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlResult, KumoError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(KumoError::InvalidSeed {
                seed: String::new(),
                message: "seed URL is required".to_string(),
            });
        }
        let root_url = Url::parse(seed).map_err(|err| KumoError::InvalidSeed {
            seed: seed.to_string(),
            message: err.to_string(),
        })?;

        let context = Arc::new(CrawlContext::new(root_url.clone(), self.config.clone()));
        let pool = Arc::new(WorkerPool::new(self.config.max_concurrent_threads));
        let (events, dispatch) = EventDispatcher::start(self.listeners.clone());

        let pipeline = Arc::new(Pipeline {
            scheduler: Arc::clone(&self.scheduler),
            requester: Arc::clone(&self.requester),
            decider: Arc::clone(&self.decider),
            extractor: Arc::clone(&self.extractor),
            context: Arc::clone(&context),
            events,
        });

        tracing::info!("starting crawl at {root_url}");
        self.scheduler.add(PageToCrawl::seed(root_url.clone()));

        loop {
            if let Some(page) = self.scheduler.get_next() {
                let pipeline = Arc::clone(&pipeline);
                pool.do_work(async move { pipeline.process(page).await })
                    .await?;
            } else if !pool.has_running_work() {
                break;
            } else {
                // Queue drained but fetches are in flight; wait for a
                // completion, re-checking on a coarse timer regardless.
                tokio::select! {
                    _ = pool.work_completed() => {}
                    _ = tokio::time::sleep(EMPTY_QUEUE_BACKOFF) => {}
                }
            }
        }

        pool.shutdown().await;

        // Dropping the last dispatcher handle lets the dispatch task drain
        // and exit; awaiting it guarantees listeners saw every event.
        drop(pipeline);
        let _ = dispatch.await;

        let result = CrawlResult {
            root_url,
            elapsed: context.elapsed(),
            pages_crawled: context.pages_crawled(),
        };
        tracing::info!(
            "crawl of {} finished: {} pages in {:.2?}",
            result.root_url,
            result.pages_crawled,
            result.elapsed
        );
        Ok(result)
    }
}

/// Everything a worker needs to run the per-page pipeline.
struct Pipeline {
    scheduler: Arc<dyn PageScheduler>,
    requester: Arc<dyn PageRequester>,
    decider: Arc<dyn CrawlDecider>,
    extractor: Arc<dyn LinkExtractor>,
    context: Arc<CrawlContext>,
    events: EventDispatcher,
}

impl Pipeline {
    async fn process(&self, page: PageToCrawl) {
        let decision = self
            .decider
            .should_crawl_page(Some(&page), Some(&self.context));

        // The gate reads the seen-set and the cap counters without holding
        // them, so two racing workers can both get an allow. The admission
        // itself re-checks duplicates and both caps under one lock; a loser
        // is downgraded here with the matching gate reason.
        let decision = if decision.allowed {
            match self.context.try_admit(&page.url) {
                AdmissionOutcome::Admitted => decision,
                denied => CrawlDecision::from_denied_admission(denied),
            }
        } else {
            decision
        };

        if !decision.allowed {
            tracing::debug!("crawl of {} disallowed: {}", page.url, decision.reason);
            self.events.emit(CrawlEvent::PageCrawlDisallowed {
                page: Arc::new(page),
                reason: decision.reason,
            });
            return;
        }

        let page = Arc::new(page);
        self.events
            .emit(CrawlEvent::PageCrawlStarting(Arc::clone(&page)));

        let context = Arc::clone(&self.context);
        let decider = Arc::clone(&self.decider);
        let predicate = move |partial: &CrawledPage| {
            decider.should_download_page_content(Some(partial), Some(&context))
        };
        let mut crawled = self.requester.make_request(&page.url, &predicate).await;
        crawled.page = (*page).clone();

        let crawled = Arc::new(crawled);
        self.events
            .emit(CrawlEvent::PageCrawlCompleted(Arc::clone(&crawled)));

        let links_decision = self
            .decider
            .should_crawl_page_links(Some(&crawled), Some(&self.context));
        if !links_decision.allowed {
            tracing::debug!(
                "link extraction for {} disallowed: {}",
                crawled.page.url,
                links_decision.reason
            );
            self.events.emit(CrawlEvent::PageLinksCrawlDisallowed {
                page: crawled,
                reason: links_decision.reason,
            });
            return;
        }

        // Relative links resolve against where the page was actually served
        // from, which differs from the request URL after a redirect.
        let base_url = crawled
            .response
            .as_ref()
            .map(|response| response.final_url.clone())
            .unwrap_or_else(|| crawled.page.url.clone());

        for link in self.extractor.get_links(&base_url, crawled.text()) {
            self.scheduler.add(PageToCrawl::new(
                link,
                crawled.page.root_url.clone(),
                crawled.page.url.clone(),
            ));
        }
    }
}
