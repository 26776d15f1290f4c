//! Target Plugin Port
//!
//! The capability set every remote-target plugin must provide. A plugin turns
//! a target declaration into a [`TargetContext`]: a connected client plus the
//! directory mapping for that target.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::Target;

/// Errors raised by target clients
#[derive(Debug, Error)]
pub enum ClientError {
    /// Remote file does not exist
    #[error("remote file not found: {0}")]
    NotFound(String),

    /// Local or transport I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Target declaration is unusable
    #[error("invalid target configuration: {0}")]
    InvalidTarget(String),

    /// Anything else reported by the backend
    #[error("{0}")]
    Other(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Kind of entry returned by a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteEntryKind {
    File,
    Directory,
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub name: String,
    /// Target-relative path, forward slashes
    pub path: String,
    pub kind: RemoteEntryKind,
    pub size: Option<u64>,
}

/// Minimal file client every target backend exposes.
///
/// Paths are target-relative and use forward slashes.
#[async_trait]
pub trait TargetClient: Send + Sync {
    /// Upload `data` to `path`, creating parents as needed
    async fn put(&self, path: &str, data: Vec<u8>) -> ClientResult<()>;

    /// Download the file at `path`
    async fn get(&self, path: &str) -> ClientResult<Vec<u8>>;

    /// Delete the file at `path`; deleting a missing file succeeds
    async fn delete(&self, path: &str) -> ClientResult<()>;

    /// List the direct children of `dir`
    async fn list(&self, dir: &str) -> ClientResult<Vec<RemoteEntry>>;
}

/// A connected client for one target
pub struct TargetContext {
    pub client: Box<dyn TargetClient>,
    pub target: Target,
    root_dir: String,
}

impl TargetContext {
    /// `root_dir` is the target's configured base directory on the remote side
    pub fn new(client: Box<dyn TargetClient>, target: Target, root_dir: impl Into<String>) -> Self {
        Self {
            client,
            target,
            root_dir: root_dir.into(),
        }
    }

    /// Remote directory for a workspace-relative `sub_dir`
    pub fn get_dir(&self, sub_dir: &str) -> String {
        join_target_dir(&self.root_dir, sub_dir)
    }

    /// Remote path for file `name` inside workspace-relative `sub_dir`
    pub fn file_path(&self, sub_dir: &str, name: &str) -> String {
        normalize_remote_path(&format!("{}/{}", self.get_dir(sub_dir), name))
    }
}

/// Factory for target contexts of one target type
#[async_trait]
pub trait TargetPlugin: Send + Sync {
    /// The `type` value of targets this plugin serves
    fn target_type(&self) -> &'static str;

    /// Connect a client for `target`
    async fn create_context(&self, target: &Target) -> ClientResult<TargetContext>;
}

/// Normalize a remote path: forward slashes, no empty segments, no leading or
/// trailing slash
pub fn normalize_remote_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a target root directory with a sub directory
pub fn join_target_dir(root_dir: &str, sub_dir: &str) -> String {
    normalize_remote_path(&format!(
        "{}/{}",
        normalize_remote_path(root_dir),
        normalize_remote_path(sub_dir)
    ))
}
