//! File change kinds reported by watchers

use std::fmt;

use serde::Serialize;

/// Kind of file-system change delivered to a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChangeType {
    /// Existing file content changed
    Changed,
    /// File appeared
    Created,
    /// File disappeared
    Deleted,
}

impl FileChangeType {
    /// Whether this change should push the file to targets
    pub fn is_upload(self) -> bool {
        matches!(self, FileChangeType::Changed | FileChangeType::Created)
    }
}

impl fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileChangeType::Changed => "changed",
            FileChangeType::Created => "created",
            FileChangeType::Deleted => "deleted",
        };
        f.write_str(label)
    }
}
