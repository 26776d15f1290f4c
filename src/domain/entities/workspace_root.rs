//! Workspace root entity

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::path;

/// Identifier of a workspace root, unique within the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<usize> for WorkspaceId {
    fn from(value: usize) -> Self {
        Self(value.to_string())
    }
}

/// One opened project folder. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRoot {
    id: WorkspaceId,
    folder: PathBuf,
}

impl WorkspaceRoot {
    /// Create a root; relative folders are anchored at the current directory
    pub fn new(id: WorkspaceId, folder: impl AsRef<Path>) -> Self {
        let folder = folder.as_ref();
        let folder = std::path::absolute(folder).unwrap_or_else(|_| folder.to_path_buf());
        let normalized = path::resolve(&path::path_to_string(&folder), "");
        Self {
            id,
            folder: PathBuf::from(normalized),
        }
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    /// Absolute, lexically normalized folder
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Folder in the separator-uniform string form used for path math
    pub fn folder_str(&self) -> String {
        path::path_to_string(&self.folder)
    }

    /// Display name: the last segment of the folder
    pub fn name(&self) -> String {
        self.folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.folder_str())
    }

    /// Whether two roots point at the same folder once resolved
    pub fn same_folder(&self, other: &WorkspaceRoot) -> bool {
        path::resolve(&self.folder_str(), "") == path::resolve(&other.folder_str(), "")
    }
}
