//! Domain Value Objects
//!
//! Immutable value types with no identity.

pub mod change_type;
pub mod config_source;
pub mod file_filter;
pub mod path;
pub mod snapshot;

pub use change_type::FileChangeType;
pub use config_source::{ConfigSource, SETTINGS_FILE, SETTINGS_SECTION};
pub use file_filter::{FileFilter, ALL_FILES};
pub use path::NameAndPath;
pub use snapshot::ConfigSnapshot;
