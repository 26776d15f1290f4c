//! File-system watcher
//!
//! Wraps a `notify` watcher and forwards classified changes into a tokio
//! channel consumed by [`run_watch`](crate::application::run_watch).

use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::ports::Disposable;
use crate::domain::value_objects::FileChangeType;
use crate::error::{HoistError, HoistResult};

pub type ChangeSender = UnboundedSender<(PathBuf, FileChangeType)>;

/// Recursive watcher over a set of workspace folders
pub struct FileWatcher {
    watcher: Option<RecommendedWatcher>,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Start watching `roots` recursively; changes go to `sender`
    pub fn start(roots: &[PathBuf], sender: ChangeSender) -> HoistResult<Self> {
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for change in changes_of(&event) {
                        // receiver gone means the watch loop has stopped
                        let _ = sender.send(change);
                    }
                }
                Err(err) => tracing::warn!(error = %err, "watcher error"),
            },
            Config::default(),
        )
        .map_err(|e| HoistError::Watch(e.to_string()))?;

        for root in roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| HoistError::Watch(format!("{}: {}", root.display(), e)))?;
            tracing::debug!(root = %root.display(), "watching");
        }

        Ok(Self {
            watcher: Some(watcher),
            roots: roots.to_vec(),
        })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }
}

impl Disposable for FileWatcher {
    fn dispose(&mut self) -> Result<()> {
        if let Some(mut watcher) = self.watcher.take() {
            for root in &self.roots {
                if let Err(err) = watcher.unwatch(root) {
                    tracing::debug!(root = %root.display(), error = %err, "unwatch failed");
                }
            }
        }
        Ok(())
    }
}

/// Map a raw event onto per-path changes, skipping VCS internals
fn changes_of(event: &Event) -> Vec<(PathBuf, FileChangeType)> {
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = &event.kind {
        let mut changes = Vec::new();
        if let Some(from) = event.paths.first() {
            changes.push((from.clone(), FileChangeType::Deleted));
        }
        if let Some(to) = event.paths.get(1) {
            changes.push((to.clone(), FileChangeType::Created));
        }
        return changes.into_iter().filter(|(p, _)| !is_vcs_path(p)).collect();
    }

    event
        .paths
        .iter()
        .filter(|p| !is_vcs_path(p))
        .filter_map(|p| classify(&event.kind, p).map(|change| (p.clone(), change)))
        .collect()
}

/// Classify an event kind for one of its paths
pub fn classify(kind: &EventKind, path: &Path) -> Option<FileChangeType> {
    match kind {
        EventKind::Create(_) => Some(FileChangeType::Created),
        EventKind::Remove(_) => Some(FileChangeType::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(FileChangeType::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(FileChangeType::Created),
        EventKind::Modify(ModifyKind::Name(_)) => Some(if path.exists() {
            FileChangeType::Created
        } else {
            FileChangeType::Deleted
        }),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(FileChangeType::Changed),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

fn is_vcs_path(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == ".git"))
}
