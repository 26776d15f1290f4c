//! Delete Prompt Port
//!
//! Asks whether local files should be removed after they were deleted on a
//! target. Implementations can be interactive or answer with a fixed policy.

use std::path::PathBuf;

/// Trait for confirming local deletions
pub trait DeletePrompt: Send + Sync {
    /// Return true to delete `files` locally as well
    fn confirm_delete_local(&self, files: &[PathBuf]) -> bool;
}

/// Prompt that always gives the same answer.
///
/// Use `FixedAnswer(false)` for non-interactive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl DeletePrompt for FixedAnswer {
    fn confirm_delete_local(&self, _files: &[PathBuf]) -> bool {
        self.0
    }
}
