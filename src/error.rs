//! Error types for Hoist
//!
//! Uses `thiserror` for library errors. Not-applicable outcomes (a path outside
//! the workspace, a descriptor owned by another workspace) are never errors;
//! they surface as `None`/`false` from the respective lookups.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::ClientError;

/// Result type alias for Hoist operations
pub type HoistResult<T> = Result<T, HoistError>;

/// Main error type for Hoist operations
#[derive(Error, Debug)]
pub enum HoistError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file could not be parsed
    #[error("invalid settings in {file}: {message}")]
    InvalidSettings { file: PathBuf, message: String },

    /// Invalid include/exclude glob in a package filter
    #[error("invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// No package with that name in any workspace
    #[error("no package named '{0}'")]
    NoSuchPackage(String),

    /// No target with that name in the workspace
    #[error("no target named '{0}'")]
    NoSuchTarget(String),

    /// No plugin is registered for the target's type
    #[error("no plugin for target type '{kind}' (target '{target}')")]
    UnknownTargetType { kind: String, target: String },

    /// File is not part of the workspace it was handed to
    #[error("'{path}' is not inside workspace '{root}'")]
    NotInWorkspace { path: PathBuf, root: PathBuf },

    /// Descriptor belongs to a different workspace
    #[error("'{0}' is owned by another workspace")]
    NotOwned(String),

    /// Workspace was disposed
    #[error("workspace '{0}' has been disposed")]
    Disposed(String),

    /// File watcher could not be set up
    #[error("file watcher error: {0}")]
    Watch(String),

    /// Remote target client failure
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_in_workspace() {
        let err = HoistError::NotInWorkspace {
            path: PathBuf::from("/other/a.txt"),
            root: PathBuf::from("/proj"),
        };
        assert_eq!(
            err.to_string(),
            "'/other/a.txt' is not inside workspace '/proj'"
        );
    }

    #[test]
    fn test_error_display_unknown_target_type() {
        let err = HoistError::UnknownTargetType {
            kind: "sftp".to_string(),
            target: "staging".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no plugin for target type 'sftp' (target 'staging')"
        );
    }

    #[test]
    fn test_client_error_is_transparent() {
        let err: HoistError = ClientError::NotFound("a/b.txt".to_string()).into();
        assert_eq!(err.to_string(), "remote file not found: a/b.txt");
    }
}
