//! Config repository port - abstracts where workspace settings come from.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::value_objects::{ConfigSnapshot, ConfigSource};

/// Repository trait for workspace settings.
///
/// Both calls are suspension points: discovery probes candidates one at a
/// time and reload fetches the snapshot for the resolved source.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Whether `path` exists and is a regular file.
    ///
    /// An error aborts settings discovery; the workspace then falls back to
    /// its default source.
    async fn is_file(&self, path: &Path) -> Result<bool>;

    /// Read the snapshot for `source`.
    ///
    /// A missing file or section is an empty snapshot, not an error.
    async fn load(&self, source: &ConfigSource) -> Result<ConfigSnapshot>;
}
