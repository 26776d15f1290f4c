//! Configuration snapshot
//!
//! An opaque key/value mapping read from the settings section. Snapshots are
//! replaced wholesale on reload and never mutated in place.

use serde_json::{Map, Value};

/// One loaded configuration section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSnapshot {
    values: Map<String, Value>,
}

impl ConfigSnapshot {
    /// An empty snapshot (missing file or section)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a JSON value; anything but an object yields an empty snapshot
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            _ => Self::empty(),
        }
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Declaration list under `key`; a missing or non-array value has no items
    pub fn declarations(&self, key: &str) -> &[Value] {
        match self.values.get(key) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Preferred UI language, if configured
    pub fn language(&self) -> Option<&str> {
        self.values
            .get("language")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}
