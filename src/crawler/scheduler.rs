//! Scheduling of pending crawl work
//!
//! The engine is polymorphic over the queue contract: enqueue, dequeue,
//! count. The default implementation is FIFO; alternative orderings
//! (priority, depth-first) can slot in without engine changes.

use crate::page::PageToCrawl;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// The queue contract the engine drives.
///
/// Implementations must accept concurrent `add` calls from workers while
/// the engine drains via `get_next`.
pub trait PageScheduler: Send + Sync {
    /// Enqueues a work item; ownership moves into the queue.
    fn add(&self, page: PageToCrawl);

    /// Removes and returns the oldest still-queued page, or `None` when the
    /// queue is empty.
    fn get_next(&self) -> Option<PageToCrawl>;

    /// Number of currently queued pages.
    fn count(&self) -> usize;
}

/// First-in-first-out scheduler.
///
/// Duplicate suppression is not performed here; the decision gates consult
/// the crawl context's seen-set for that.
#[derive(Debug, Default)]
pub struct FifoScheduler {
    queue: Mutex<VecDeque<PageToCrawl>>,
}

impl FifoScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<PageToCrawl>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PageScheduler for FifoScheduler {
    fn add(&self, page: PageToCrawl) {
        self.queue().push_back(page);
    }

    fn get_next(&self) -> Option<PageToCrawl> {
        self.queue().pop_front()
    }

    fn count(&self) -> usize {
        self.queue().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(path: &str) -> PageToCrawl {
        let root = Url::parse("https://example.com/").unwrap();
        PageToCrawl::new(
            Url::parse(&format!("https://example.com{path}")).unwrap(),
            root.clone(),
            root,
        )
    }

    #[test]
    fn test_new_scheduler_is_empty() {
        let scheduler = FifoScheduler::new();
        assert_eq!(scheduler.count(), 0);
        assert!(scheduler.get_next().is_none());
    }

    #[test]
    fn test_fifo_order() {
        let scheduler = FifoScheduler::new();
        scheduler.add(page("/1"));
        scheduler.add(page("/2"));
        scheduler.add(page("/3"));
        assert_eq!(scheduler.count(), 3);

        assert_eq!(scheduler.get_next().unwrap().url.path(), "/1");
        assert_eq!(scheduler.count(), 2);
        assert_eq!(scheduler.get_next().unwrap().url.path(), "/2");
        assert_eq!(scheduler.count(), 1);
        assert_eq!(scheduler.get_next().unwrap().url.path(), "/3");
        assert_eq!(scheduler.count(), 0);
        assert!(scheduler.get_next().is_none());
    }

    #[test]
    fn test_duplicates_are_not_suppressed_here() {
        let scheduler = FifoScheduler::new();
        scheduler.add(page("/same"));
        scheduler.add(page("/same"));
        assert_eq!(scheduler.count(), 2);
    }

    #[test]
    fn test_concurrent_adds() {
        use std::sync::Arc;
        use std::thread;

        let scheduler = Arc::new(FifoScheduler::new());
        let mut handles = Vec::new();
        for t in 0..4 {
            let scheduler = Arc::clone(&scheduler);
            handles.push(thread::spawn(move || {
                for i in 0..25 {
                    scheduler.add(page(&format!("/{t}-{i}")));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("adder thread");
        }
        assert_eq!(scheduler.count(), 100);
    }
}
