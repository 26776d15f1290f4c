//! Settings file access

pub mod json_settings;

pub use json_settings::{parse_section, strip_jsonc, JsonSettingsRepository};
