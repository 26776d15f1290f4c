//! Interactive delete confirmation

use std::path::PathBuf;

use dialoguer::Confirm;
use is_terminal::IsTerminal;

use crate::domain::ports::DeletePrompt;

/// Asks on the terminal; answers no when stdin is not interactive
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPrompt;

impl DialoguerPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl DeletePrompt for DialoguerPrompt {
    fn confirm_delete_local(&self, files: &[PathBuf]) -> bool {
        if files.is_empty() || !std::io::stdin().is_terminal() {
            return false;
        }

        let prompt = match files {
            [single] => format!("Also delete local file {}?", single.display()),
            _ => format!("Also delete {} local files?", files.len()),
        };
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
