//! Runtime configuration
//!
//! Workspace settings (packages, targets) live in each project's
//! `.vscode/settings.json` and are read through the `ConfigRepository` port.
//! This module only holds the process-level knobs of the orchestrator itself,
//! with `HOIST_*` environment overrides.

use std::time::Duration;

/// Default delay before a busy reload or file change is retried
pub const DEFAULT_RETRY_DELAY_MS: u64 = 250;

/// Default window for coalescing raw watcher events
pub const DEFAULT_WATCH_DEBOUNCE_MS: u64 = 100;

/// Process-level settings shared by every workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Delay before re-submitting a reload or change that found its slot busy
    pub retry_delay: Duration,
    /// Quiet period before buffered watcher events are handed to workspaces
    pub watch_debounce: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            watch_debounce: Duration::from_millis(DEFAULT_WATCH_DEBOUNCE_MS),
        }
    }
}

impl RuntimeConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        with_env_overrides(Self::default())
    }

    /// Set the retry delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the watcher debounce window
    pub fn with_watch_debounce(mut self, debounce: Duration) -> Self {
        self.watch_debounce = debounce;
        self
    }
}

/// Apply environment variable overrides (HOIST_* prefix)
pub fn with_env_overrides(mut config: RuntimeConfig) -> RuntimeConfig {
    // HOIST_RETRY_DELAY_MS
    if let Some(ms) = env_millis("HOIST_RETRY_DELAY_MS") {
        config.retry_delay = ms;
    }

    // HOIST_WATCH_DEBOUNCE_MS
    if let Some(ms) = env_millis("HOIST_WATCH_DEBOUNCE_MS") {
        config.watch_debounce = ms;
    }

    config
}

fn env_millis(name: &str) -> Option<Duration> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring non-numeric override");
            None
        }
    }
}
