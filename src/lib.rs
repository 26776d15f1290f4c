//! Hoist - workspace-driven file deployment orchestrator
//!
//! Hoist opens one or more project folders as workspaces, reads their
//! package and target declarations from `.vscode/settings.json`, and deploys
//! files to targets through pluggable target clients. In watch mode changes
//! are deployed automatically, with a process-wide per-file lock that keeps
//! overlapping workspaces from handling the same file twice.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    run_watch, ChangeDebouncer, ChangeTable, ConfigStore, DeployOperations, PluginDeployer,
    PluginRegistry, ReloadOutcome, RetryScheduler, WatchEvent, Workspace, WorkspaceContext,
    WorkspaceState,
};
pub use config::RuntimeConfig;
pub use domain::entities::{Package, Target, WorkspaceId, WorkspaceRoot};
pub use domain::value_objects::{ConfigSnapshot, ConfigSource, FileChangeType, FileFilter};
pub use error::{HoistError, HoistResult};
pub use infrastructure::{
    default_registry, CatalogTranslatorFactory, DialoguerPrompt, FileWatcher,
    JsonSettingsRepository,
};
