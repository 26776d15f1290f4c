//! Per-path change debouncing
//!
//! File events are routed through a shared [`ChangeTable`]: while one event for
//! a path is being dispatched, later events for the same path are either
//! deferred (retried after a delay) or dropped. Events for different paths run
//! concurrently.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::change_table::ChangeTable;
use crate::application::retry::RetryScheduler;
use crate::domain::value_objects::FileChangeType;
use crate::error::HoistResult;

/// Receiver of debounced file changes
#[async_trait]
pub trait ChangeHandler: Send + Sync + 'static {
    /// Whether `path` is handled here at all; rejected paths are ignored
    /// silently
    fn accepts(&self, path: &str) -> bool;

    /// Handle one change while the path is held
    async fn dispatch(&self, path: &str, change: FileChangeType) -> HoistResult<()>;
}

/// What happened to a submitted change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The handler does not accept the path
    Ignored,
    /// Path was busy; a retry has been scheduled
    Deferred,
    /// Path was busy and retry was not requested
    Skipped,
    /// The handler ran
    Dispatched,
}

/// Routes changes through the shared table
#[derive(Debug, Clone)]
pub struct ChangeDebouncer {
    table: Arc<ChangeTable>,
    scheduler: RetryScheduler,
}

impl ChangeDebouncer {
    pub fn new(table: Arc<ChangeTable>, scheduler: RetryScheduler) -> Self {
        Self { table, scheduler }
    }

    pub fn table(&self) -> &Arc<ChangeTable> {
        &self.table
    }

    pub fn scheduler(&self) -> &RetryScheduler {
        &self.scheduler
    }

    /// Submit a change for `path`.
    ///
    /// Errors from the handler are returned to the caller; the table entry is
    /// released either way.
    pub async fn handle_change<H: ChangeHandler>(
        &self,
        handler: &Arc<H>,
        path: &str,
        change: FileChangeType,
        retry: bool,
    ) -> HoistResult<ChangeOutcome> {
        if !handler.accepts(path) {
            return Ok(ChangeOutcome::Ignored);
        }

        let Some(_lease) = self.table.try_acquire(path, change) else {
            if retry {
                tracing::debug!(path, %change, "path busy, retrying later");
                self.schedule_retry(Arc::clone(handler), path.to_string(), change);
                return Ok(ChangeOutcome::Deferred);
            }
            tracing::debug!(path, %change, "path busy, skipping");
            return Ok(ChangeOutcome::Skipped);
        };

        handler.dispatch(path, change).await?;
        Ok(ChangeOutcome::Dispatched)
    }

    fn schedule_retry<H: ChangeHandler>(&self, handler: Arc<H>, path: String, change: FileChangeType) {
        let debouncer = self.clone();
        let task: Pin<Box<dyn Future<Output = ()> + Send>> = Box::pin(async move {
            if let Err(err) = debouncer.handle_change(&handler, &path, change, true).await {
                tracing::warn!(path = %path, %change, error = %err, "deferred change failed");
            }
        });
        self.scheduler.schedule(task);
    }
}
