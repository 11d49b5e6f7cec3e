//! Bounded-parallelism executor for per-page pipelines
//!
//! A thin coordination layer over tokio tasks: a semaphore caps how many
//! submitted tasks run at once, an active counter answers the engine's
//! "any work in flight?" question, and a notifier wakes the engine when a
//! task finishes.

use crate::KumoError;
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs submitted tasks with at most a fixed number in flight.
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    completed: Arc<Notify>,
    shutting_down: AtomicBool,
}

impl WorkerPool {
    /// Creates a pool running at most `max_concurrent` tasks at once.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            active: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(Notify::new()),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Submits a task, waiting until a worker slot frees up.
    ///
    /// A panicking task is logged and releases its slot; it cannot take the
    /// pool down with it.
    pub async fn do_work<F>(&self, task: F) -> Result<(), KumoError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(KumoError::PoolShutDown);
        }

        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| KumoError::PoolShutDown)?;

        self.active.fetch_add(1, Ordering::AcqRel);
        let active = Arc::clone(&self.active);
        let completed = Arc::clone(&self.completed);

        tokio::spawn(async move {
            if let Err(panic) = AssertUnwindSafe(task).catch_unwind().await {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::error!("worker task panicked: {message}");
            }
            drop(permit);
            active.fetch_sub(1, Ordering::AcqRel);
            completed.notify_waiters();
        });

        Ok(())
    }

    /// True while at least one submitted task has not yet completed.
    pub fn has_running_work(&self) -> bool {
        self.active.load(Ordering::Acquire) > 0
    }

    /// Resolves the next time any task finishes.
    pub async fn work_completed(&self) {
        self.completed.notified().await;
    }

    /// Stops accepting work and waits for in-flight tasks to finish.
    pub async fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::Release);
        while self.has_running_work() {
            tokio::select! {
                _ = self.completed.notified() => {}
                _ = tokio::time::sleep(SHUTDOWN_POLL_INTERVAL) => {}
            }
        }
    }
}
