//! Process-wide table of in-flight file changes
//!
//! A path is present exactly while a handler for it runs. Every workspace of
//! the process shares one table, so a file reachable from two roots is still
//! handled by one of them at a time.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::value_objects::FileChangeType;

/// Shared path to change-type map
#[derive(Debug, Default)]
pub struct ChangeTable {
    entries: DashMap<String, FileChangeType>,
}

impl ChangeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `path` for `change`.
    ///
    /// Returns `None` when another handler already holds the path. The
    /// returned lease removes the entry when dropped.
    pub fn try_acquire(self: &Arc<Self>, path: &str, change: FileChangeType) -> Option<ChangeLease> {
        match self.entries.entry(path.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(change);
                Some(ChangeLease {
                    table: Arc::clone(self),
                    path: path.to_string(),
                })
            }
        }
    }

    /// Remove the entry for `path`; returns whether one was present
    pub fn release(&self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Change type currently being handled for `path`
    #[must_use]
    pub fn current(&self, path: &str) -> Option<FileChangeType> {
        self.entries.get(path).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Exclusive claim on one path of a [`ChangeTable`]
#[derive(Debug)]
pub struct ChangeLease {
    table: Arc<ChangeTable>,
    path: String,
}

impl ChangeLease {
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Drop for ChangeLease {
    fn drop(&mut self) {
        self.table.release(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused() {
        let table = Arc::new(ChangeTable::new());
        let lease = table.try_acquire("/proj/a.txt", FileChangeType::Changed);
        assert!(lease.is_some());
        assert!(table
            .try_acquire("/proj/a.txt", FileChangeType::Deleted)
            .is_none());
        assert_eq!(table.current("/proj/a.txt"), Some(FileChangeType::Changed));
    }

    #[test]
    fn dropping_lease_releases_path() {
        let table = Arc::new(ChangeTable::new());
        {
            let lease = table
                .try_acquire("/proj/a.txt", FileChangeType::Created)
                .unwrap();
            assert_eq!(lease.path(), "/proj/a.txt");
            assert!(table.contains("/proj/a.txt"));
        }
        assert!(table.is_empty());
        assert!(table
            .try_acquire("/proj/a.txt", FileChangeType::Changed)
            .is_some());
    }

    #[test]
    fn different_paths_do_not_block_each_other() {
        let table = Arc::new(ChangeTable::new());
        let _a = table.try_acquire("/a", FileChangeType::Changed).unwrap();
        let _b = table.try_acquire("/b", FileChangeType::Changed).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn explicit_release_before_drop_is_harmless() {
        let table = Arc::new(ChangeTable::new());
        let lease = table.try_acquire("/a", FileChangeType::Changed).unwrap();
        assert!(table.release("/a"));
        drop(lease);
        assert!(table.is_empty());
    }

    #[test]
    fn lease_released_on_panic() {
        let table = Arc::new(ChangeTable::new());
        let shared = table.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _lease = shared.try_acquire("/a", FileChangeType::Changed).unwrap();
            panic!("handler failed");
        }));
        assert!(result.is_err());
        assert!(!table.contains("/a"));
    }
}
