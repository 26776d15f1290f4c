//! Bundled target plugins

pub mod local;

use std::sync::Arc;

use crate::application::PluginRegistry;
use crate::domain::ports::TargetPlugin;

pub use local::{LocalClient, LocalPlugin, LOCAL_TYPE};

/// Every bundled plugin
pub fn all_plugins() -> Vec<Arc<dyn TargetPlugin>> {
    vec![Arc::new(LocalPlugin::new())]
}

/// Bundled plugin for a target type
pub fn get_plugin(kind: &str) -> Option<Arc<dyn TargetPlugin>> {
    all_plugins().into_iter().find(|p| p.target_type() == kind)
}

/// Registry holding every bundled plugin
pub fn default_registry() -> PluginRegistry {
    all_plugins()
        .into_iter()
        .fold(PluginRegistry::new(), PluginRegistry::with_plugin)
}
