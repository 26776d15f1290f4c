//! Local directory targets
//!
//! `{"type": "local", "dir": "/srv/site"}` mirrors files into a directory on
//! this machine. A relative `dir` is taken relative to the workspace folder
//! that declares the target. An optional `prefix` is prepended to every
//! remote path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::entities::Target;
use crate::domain::ports::{
    normalize_remote_path, ClientError, ClientResult, RemoteEntry, RemoteEntryKind,
    TargetClient, TargetContext, TargetPlugin,
};

/// Target type served by [`LocalPlugin`]
pub const LOCAL_TYPE: &str = "local";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPlugin;

impl LocalPlugin {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TargetPlugin for LocalPlugin {
    fn target_type(&self) -> &'static str {
        LOCAL_TYPE
    }

    async fn create_context(&self, target: &Target) -> ClientResult<TargetContext> {
        let dir = target
            .get_str("dir")
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .ok_or_else(|| {
                ClientError::InvalidTarget(format!("target '{}' has no 'dir'", target.name()))
            })?;

        let mut base = PathBuf::from(dir);
        if base.is_relative() {
            let owner = target.owner().ok_or_else(|| {
                ClientError::InvalidTarget(format!(
                    "target '{}' has a relative 'dir' but no workspace",
                    target.name()
                ))
            })?;
            base = owner.folder().join(base);
        }

        let prefix = target.get_str("prefix").unwrap_or_default();
        tracing::debug!(target = %target.name(), base = %base.display(), "local target");
        Ok(TargetContext::new(
            Box::new(LocalClient::new(base)),
            target.clone(),
            prefix,
        ))
    }
}

/// File client over a local base directory
#[derive(Debug, Clone)]
pub struct LocalClient {
    base: PathBuf,
}

impl LocalClient {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map a target-relative path below the base directory
    fn local_path(&self, path: &str) -> ClientResult<PathBuf> {
        let normalized = normalize_remote_path(path);
        let mut local = self.base.clone();
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(ClientError::Other(format!("path escapes target: {}", path)));
            }
            local.push(segment);
        }
        Ok(local)
    }
}

fn not_found(path: &str, err: std::io::Error) -> ClientError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ClientError::NotFound(path.to_string())
    } else {
        ClientError::Io(err)
    }
}

#[async_trait]
impl TargetClient for LocalClient {
    async fn put(&self, path: &str, data: Vec<u8>) -> ClientResult<()> {
        let local = self.local_path(path)?;
        let parent = local
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base.clone());
        tokio::fs::create_dir_all(&parent).await?;

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            use std::io::Write;
            let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
            tmp.write_all(&data)?;
            tmp.persist(&local).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| ClientError::Other(e.to_string()))??;
        Ok(())
    }

    async fn get(&self, path: &str) -> ClientResult<Vec<u8>> {
        let local = self.local_path(path)?;
        tokio::fs::read(&local).await.map_err(|e| not_found(path, e))
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let local = self.local_path(path)?;
        match tokio::fs::remove_file(&local).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, dir: &str) -> ClientResult<Vec<RemoteEntry>> {
        let local = self.local_path(dir)?;
        let mut reader = tokio::fs::read_dir(&local).await.map_err(|e| not_found(dir, e))?;
        let prefix = normalize_remote_path(dir);

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let meta = entry.metadata().await?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            let (kind, size) = if meta.is_dir() {
                (RemoteEntryKind::Directory, None)
            } else {
                (RemoteEntryKind::File, Some(meta.len()))
            };
            entries.push(RemoteEntry {
                name,
                path,
                kind,
                size,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
