//! JSON settings repository
//!
//! Reads `.vscode/settings.json` style files: JSON with `//` and `/* */`
//! comments and trailing commas. The configured section is looked up either
//! as a flat dotted key (`"deploy.reloaded": {...}`) or as nested objects
//! (`"deploy": {"reloaded": {...}}`).

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use json_comments::{strip_comments_in_place, CommentSettings};
use serde_json::Value;

use crate::domain::ports::ConfigRepository;
use crate::domain::value_objects::{ConfigSnapshot, ConfigSource};
use crate::error::HoistError;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSettingsRepository;

impl JsonSettingsRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConfigRepository for JsonSettingsRepository {
    async fn is_file(&self, path: &Path) -> Result<bool> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn load(&self, source: &ConfigSource) -> Result<ConfigSnapshot> {
        let text = match tokio::fs::read_to_string(source.resource()).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigSnapshot::empty());
            }
            Err(err) => return Err(err.into()),
        };
        parse_section(&text, source.section()).map_err(|message| {
            HoistError::InvalidSettings {
                file: source.resource().to_path_buf(),
                message,
            }
            .into()
        })
    }
}

/// Parse settings text and extract `section`
pub fn parse_section(text: &str, section: &str) -> std::result::Result<ConfigSnapshot, String> {
    let cleaned = strip_jsonc(text)?;
    if cleaned.trim().is_empty() {
        return Ok(ConfigSnapshot::empty());
    }

    let root: Value = serde_json::from_str(&cleaned).map_err(|e| e.to_string())?;
    let Value::Object(root) = root else {
        return Err("settings root must be an object".to_string());
    };

    if let Some(value) = root.get(section) {
        return Ok(ConfigSnapshot::from_value(value.clone()));
    }

    let mut current = root.get(section.split('.').next().unwrap_or(section));
    for part in section.split('.').skip(1) {
        current = current.and_then(|value| value.get(part));
    }
    Ok(current
        .cloned()
        .map(ConfigSnapshot::from_value)
        .unwrap_or_default())
}

/// Remove comments and trailing commas, keeping string contents intact.
///
/// Stripped characters are blanked in place, so the text keeps its length.
pub fn strip_jsonc(text: &str) -> std::result::Result<String, String> {
    let mut cleaned = text.to_string();
    strip_comments_in_place(&mut cleaned, CommentSettings::c_style(), true)
        .map_err(|e| e.to_string())?;
    Ok(cleaned)
}
