//! Where a workspace reads its settings from

use std::path::{Path, PathBuf};

/// Settings file looked up in every directory from the workspace root upwards
pub const SETTINGS_FILE: &str = ".vscode/settings.json";

/// Section inside the settings file holding the deploy configuration
pub const SETTINGS_SECTION: &str = "deploy.reloaded";

/// Location of a workspace's configuration values.
///
/// Fixed once discovery has run; never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigSource {
    resource: PathBuf,
    section: String,
}

impl ConfigSource {
    pub fn new(resource: impl Into<PathBuf>, section: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            section: section.into(),
        }
    }

    /// The fallback source for a workspace root: `<root>/.vscode/settings.json`,
    /// whether or not that file exists
    pub fn default_for(root: &Path) -> Self {
        Self::new(root.join(SETTINGS_FILE), SETTINGS_SECTION)
    }

    /// Path of the settings file
    pub fn resource(&self) -> &Path {
        &self.resource
    }

    /// Dotted section name inside the settings file
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Directory holding the settings file
    pub fn settings_dir(&self) -> &Path {
        self.resource.parent().unwrap_or(&self.resource)
    }
}
