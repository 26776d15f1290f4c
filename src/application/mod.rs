//! Application Layer
//!
//! Orchestrates domain rules with infrastructure through ports:
//!
//! - `ConfigStore` - per-workspace snapshot, reload guard and translator
//! - `ChangeTable` / `ChangeDebouncer` - process-wide per-path exclusion
//! - `Workspace` - lifecycle, descriptor lookup and event routing
//! - `PluginDeployer` - deploy/pull/delete through target plugins
//! - `run_watch` - debounced file events into workspaces

pub mod change_table;
pub mod config_store;
pub mod debounce;
pub mod deployer;
pub mod files;
pub mod operations;
pub mod plugins;
pub mod retry;
pub mod watch;
pub mod workspace;

pub use change_table::{ChangeLease, ChangeTable};
pub use config_store::{ConfigStore, ReloadOutcome, StoreState};
pub use debounce::{ChangeDebouncer, ChangeHandler, ChangeOutcome};
pub use deployer::PluginDeployer;
pub use files::{find_files, FileMatcher};
pub use operations::DeployOperations;
pub use plugins::PluginRegistry;
pub use retry::RetryScheduler;
pub use watch::{run_watch, WatchEvent, WatchSink};
pub use workspace::{Workspace, WorkspaceContext, WorkspaceState};
