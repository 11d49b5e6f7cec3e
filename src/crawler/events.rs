//! Crawl lifecycle events and their dispatch
//!
//! Workers hand events to a dedicated dispatch task through an unbounded
//! channel, so emitting never blocks the per-page pipeline. The dispatch
//! task invokes every registered listener in emission order, which keeps
//! the per-page Starting → Completed ordering observable to embedders. A
//! panicking listener is logged and skipped; it cannot reach the engine.

use crate::page::{CrawledPage, PageToCrawl};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Lifecycle notifications emitted while a crawl runs.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A page passed the admission gate and is about to be fetched
    PageCrawlStarting(Arc<PageToCrawl>),

    /// A page's fetch finished, successfully or not
    PageCrawlCompleted(Arc<CrawledPage>),

    /// A page was denied at the admission gate
    PageCrawlDisallowed {
        page: Arc<PageToCrawl>,
        reason: String,
    },

    /// A fetched page was denied at the link-extraction gate
    PageLinksCrawlDisallowed {
        page: Arc<CrawledPage>,
        reason: String,
    },
}

/// A subscriber to crawl lifecycle events.
pub type EventListener = Arc<dyn Fn(&CrawlEvent) + Send + Sync>;

/// Per-crawl event fan-out. Cloned into every worker; the dispatch task
/// exits once every clone is dropped and the channel drains.
#[derive(Clone)]
pub(crate) struct EventDispatcher {
    sender: mpsc::UnboundedSender<CrawlEvent>,
}

impl EventDispatcher {
    /// Spawns the dispatch task and returns the emitting handle plus the
    /// task handle to await for a drain.
    pub(crate) fn start(listeners: Vec<EventListener>) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<CrawlEvent>();
        let handle = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                for listener in &listeners {
                    if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                        tracing::warn!("event listener panicked; continuing");
                    }
                }
            }
        });
        (Self { sender }, handle)
    }

    /// Queues an event for dispatch. Never blocks.
    pub(crate) fn emit(&self, event: CrawlEvent) {
        // Send only fails when the dispatch task is gone, at which point
        // there is nobody left to notify.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use url::Url;

    fn starting_event(path: &str) -> CrawlEvent {
        let url = Url::parse(&format!("https://example.com{path}")).unwrap();
        CrawlEvent::PageCrawlStarting(Arc::new(PageToCrawl::seed(url)))
    }

    #[tokio::test]
    async fn test_events_reach_listeners_in_order() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let listener: EventListener = Arc::new(move |event| {
            if let CrawlEvent::PageCrawlStarting(page) = event {
                seen_clone.lock().unwrap().push(page.url.path().to_string());
            }
        });

        let (dispatcher, handle) = EventDispatcher::start(vec![listener]);
        dispatcher.emit(starting_event("/1"));
        dispatcher.emit(starting_event("/2"));
        dispatcher.emit(starting_event("/3"));
        drop(dispatcher);
        handle.await.expect("dispatch task");

        assert_eq!(*seen.lock().unwrap(), vec!["/1", "/2", "/3"]);
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_stop_dispatch() {
        let count = Arc::new(Mutex::new(0u32));
        let count_clone = Arc::clone(&count);

        let bad: EventListener = Arc::new(|_| panic!("subscriber bug"));
        let good: EventListener = Arc::new(move |_| {
            *count_clone.lock().unwrap() += 1;
        });

        let (dispatcher, handle) = EventDispatcher::start(vec![bad, good]);
        dispatcher.emit(starting_event("/a"));
        dispatcher.emit(starting_event("/b"));
        drop(dispatcher);
        handle.await.expect("dispatch task survives listener panics");

        assert_eq!(*count.lock().unwrap(), 2);
    }
}
