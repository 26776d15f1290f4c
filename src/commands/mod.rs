//! Subcommand implementations

pub mod listing;
pub mod transfer;
pub mod watch;
pub mod workspaces;

use serde_json::Value;

/// Human or NDJSON output, selected by `--json`
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print one JSON event (only in `--json` mode)
    pub fn event(&self, value: Value) {
        if self.json {
            println!("{}", value);
        }
    }

    /// Print a human line (suppressed in `--json` mode)
    pub fn line(&self, text: impl AsRef<str>) {
        if !self.json {
            println!("{}", text.as_ref());
        }
    }
}
