//! Delayed re-submission of work that found its slot busy.
//!
//! Each retry is a fresh task on the tokio runtime that sleeps for the
//! configured delay and then runs. A retry that is itself refused schedules
//! another one, so sustained contention grows the task count by one at a time
//! and never the call stack.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

/// Spawns delayed retries and tracks how many are outstanding
#[derive(Debug, Clone)]
pub struct RetryScheduler {
    delay: Duration,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl RetryScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Retries scheduled but not yet finished
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Run `task` after the retry delay.
    ///
    /// Must be called from within a tokio runtime; otherwise the retry is
    /// dropped with a warning.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("no async runtime available, dropping retry");
                return;
            }
        };

        self.pending.fetch_add(1, Ordering::SeqCst);
        let token = PendingToken {
            pending: Arc::clone(&self.pending),
            idle: Arc::clone(&self.idle),
        };
        let delay = self.delay;

        handle.spawn(async move {
            let _token = token;
            tokio::time::sleep(delay).await;
            task.await;
        });
    }

    /// Wait until no retry is outstanding, including retries scheduled by
    /// retries.
    pub async fn wait_idle(&self) {
        loop {
            // register before checking so a concurrent wake-up is not lost
            let notified = self.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_RETRY_DELAY_MS))
    }
}

/// Decrements the pending count when its task ends, however it ends
struct PendingToken {
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl Drop for PendingToken {
    fn drop(&mut self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}
