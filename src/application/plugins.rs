//! Registry of target plugins, keyed by target type

use std::sync::Arc;

use crate::domain::entities::Target;
use crate::domain::ports::{TargetContext, TargetPlugin};
use crate::error::{HoistError, HoistResult};

#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn TargetPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin; a later plugin for the same type replaces the earlier one
    pub fn with_plugin(mut self, plugin: Arc<dyn TargetPlugin>) -> Self {
        self.plugins.retain(|p| p.target_type() != plugin.target_type());
        self.plugins.push(plugin);
        self
    }

    /// Plugin serving targets of `kind`
    pub fn get(&self, kind: &str) -> Option<&Arc<dyn TargetPlugin>> {
        self.plugins.iter().find(|p| p.target_type() == kind)
    }

    /// Registered target types
    pub fn types(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.target_type()).collect()
    }

    /// Connect a client for `target` through its plugin
    pub async fn create_context(&self, target: &Target) -> HoistResult<TargetContext> {
        let kind = target.target_type();
        let plugin = self.get(&kind).ok_or_else(|| HoistError::UnknownTargetType {
            kind: kind.clone(),
            target: target.name(),
        })?;
        Ok(plugin.create_context(target).await?)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("types", &self.types())
            .finish()
    }
}
