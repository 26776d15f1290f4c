//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `settings/` - JSONC settings file repository
//! - `plugins/` - Target plugins (local directory)
//! - `i18n` - Built-in message catalogs
//! - `prompt` - Terminal delete confirmation
//! - `watcher` - `notify` based file watcher

pub mod i18n;
pub mod plugins;
pub mod prompt;
pub mod settings;
pub mod watcher;

// Re-export for convenience
pub use i18n::{CatalogTranslator, CatalogTranslatorFactory};
pub use plugins::{all_plugins, default_registry, get_plugin, LocalPlugin};
pub use prompt::DialoguerPrompt;
pub use settings::JsonSettingsRepository;
pub use watcher::{ChangeSender, FileWatcher};
