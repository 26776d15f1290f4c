//! Watch loop
//!
//! Raw file-system events are buffered and coalesced per path for a short
//! quiet period, then handed to every workspace that contains the path. A
//! change to a workspace's settings file triggers a reload instead of a
//! deployment.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::application::config_store::ReloadOutcome;
use crate::application::workspace::Workspace;
use crate::domain::value_objects::FileChangeType;

/// Poll interval of the watch loop
const TICK: Duration = Duration::from_millis(50);

/// Watch event types for NDJSON output
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted { roots: Vec<String> },
    FileChanged { path: String, change: FileChangeType },
    ConfigReloaded { workspace: String },
    Error { path: String, message: String },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Callback receiving watch events; invoked from spawned tasks
pub type WatchSink = Arc<dyn Fn(WatchEvent) + Send + Sync>;

/// Buffered changes waiting for the quiet period to pass
#[derive(Debug)]
pub(crate) struct PendingChanges {
    changes: HashMap<PathBuf, FileChangeType>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl PendingChanges {
    pub(crate) fn new(debounce: Duration) -> Self {
        Self {
            changes: HashMap::new(),
            last_change: None,
            debounce,
        }
    }

    /// Record a change; the latest kind for a path wins
    pub(crate) fn add_change(&mut self, path: PathBuf, change: FileChangeType) {
        self.changes.insert(path, change);
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_flush(&self) -> bool {
        match self.last_change {
            Some(last) => !self.changes.is_empty() && last.elapsed() >= self.debounce,
            None => false,
        }
    }

    /// Drain buffered changes, sorted by path
    pub(crate) fn take_changes(&mut self) -> Vec<(PathBuf, FileChangeType)> {
        self.last_change = None;
        let mut changes: Vec<_> = self.changes.drain().collect();
        changes.sort_by(|a, b| a.0.cmp(&b.0));
        changes
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Route events from `events` to `workspaces` until `shutdown` completes or
/// the event channel closes.
pub async fn run_watch<S>(
    workspaces: Vec<Arc<Workspace>>,
    mut events: UnboundedReceiver<(PathBuf, FileChangeType)>,
    debounce: Duration,
    shutdown: S,
    sink: WatchSink,
) where
    S: Future<Output = ()>,
{
    sink(WatchEvent::WatchStarted {
        roots: workspaces
            .iter()
            .map(|ws| ws.folder().display().to_string())
            .collect(),
    });

    let mut pending = PendingChanges::new(debounce);
    let mut ticker = tokio::time::interval(TICK);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            received = events.recv() => match received {
                Some((path, change)) => pending.add_change(path, change),
                None => break,
            },
            _ = ticker.tick() => {
                if pending.should_flush() {
                    for (path, change) in pending.take_changes() {
                        dispatch(&workspaces, path, change, &sink);
                    }
                }
            }
        }
    }

    if !pending.is_empty() {
        tracing::debug!("dropping unflushed changes on shutdown");
    }
    sink(WatchEvent::Shutdown);
}

fn dispatch(workspaces: &[Arc<Workspace>], path: PathBuf, change: FileChangeType, sink: &WatchSink) {
    for workspace in workspaces {
        if workspace.is_settings_file(&path) {
            let workspace = Arc::clone(workspace);
            let sink = Arc::clone(sink);
            tokio::spawn(async move {
                if workspace.on_configuration_changed().await == ReloadOutcome::Loaded {
                    sink(WatchEvent::ConfigReloaded {
                        workspace: workspace.name(),
                    });
                }
            });
            continue;
        }

        if !workspace.is_path_of(&path) {
            continue;
        }

        sink(WatchEvent::FileChanged {
            path: path.display().to_string(),
            change,
        });
        let workspace = Arc::clone(workspace);
        let sink = Arc::clone(sink);
        let path = path.clone();
        tokio::spawn(async move {
            if let Err(err) = workspace.on_file_event(&path, change).await {
                tracing::warn!(path = %path.display(), %change, error = %err, "change handling failed");
                sink(WatchEvent::Error {
                    path: path.display().to_string(),
                    message: err.to_string(),
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_change_for_a_path_wins() {
        let mut pending = PendingChanges::new(Duration::ZERO);
        pending.add_change(PathBuf::from("/p/b"), FileChangeType::Created);
        pending.add_change(PathBuf::from("/p/a"), FileChangeType::Changed);
        pending.add_change(PathBuf::from("/p/b"), FileChangeType::Deleted);

        assert!(pending.should_flush());
        assert_eq!(
            pending.take_changes(),
            vec![
                (PathBuf::from("/p/a"), FileChangeType::Changed),
                (PathBuf::from("/p/b"), FileChangeType::Deleted),
            ]
        );
        assert!(pending.is_empty());
        assert!(!pending.should_flush());
    }

    #[test]
    fn waits_for_quiet_period() {
        let mut pending = PendingChanges::new(Duration::from_secs(60));
        assert!(!pending.should_flush());
        pending.add_change(PathBuf::from("/p/a"), FileChangeType::Changed);
        assert!(!pending.should_flush());
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = WatchEvent::FileChanged {
            path: "/p/a".to_string(),
            change: FileChangeType::Created,
        };
        assert_eq!(
            event.to_json(),
            r#"{"event":"file_changed","path":"/p/a","change":"created"}"#
        );
        assert_eq!(WatchEvent::Shutdown.to_json(), r#"{"event":"shutdown"}"#);
    }
}
