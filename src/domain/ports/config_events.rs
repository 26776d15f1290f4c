//! Config reload notifications
//!
//! Listeners are invoked synchronously after every successful snapshot swap.
//! A failing listener is logged and never aborts the reload.

use anyhow::Result;

use crate::domain::entities::WorkspaceRoot;
use crate::domain::value_objects::ConfigSnapshot;

/// Event name of the reload notification
pub const EVENT_CONFIG_RELOADED: &str = "config-reloaded";

/// Payload of a reload notification
#[derive(Debug, Clone, Copy)]
pub struct ConfigReloaded<'a> {
    pub workspace: &'a WorkspaceRoot,
    pub current: &'a ConfigSnapshot,
    /// Snapshot that was replaced; absent on the first load
    pub previous: Option<&'a ConfigSnapshot>,
}

/// Receives reload notifications
pub trait ConfigReloadListener: Send + Sync {
    fn on_config_reloaded(&self, event: &ConfigReloaded<'_>) -> Result<()>;
}

/// Handle returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl<F> ConfigReloadListener for F
where
    F: Fn(&ConfigReloaded<'_>) -> Result<()> + Send + Sync,
{
    fn on_config_reloaded(&self, event: &ConfigReloaded<'_>) -> Result<()> {
        self(event)
    }
}
