//! Translator port
//!
//! Message lookup for user-facing text. A workspace rebuilds its translator
//! after every configuration reload.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::value_objects::ConfigSnapshot;

/// Looks up message templates by key
pub trait Translator: Send + Sync {
    /// Template for `key`, if known
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Builds a translator for a configuration snapshot
#[async_trait]
pub trait TranslatorFactory: Send + Sync {
    async fn create(&self, snapshot: &ConfigSnapshot) -> Result<Arc<dyn Translator>>;
}

/// Replace `{0}`, `{1}`, ... with positional arguments.
///
/// Placeholders without a matching argument are left untouched.
pub fn format_positional(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].trim().parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
