//! Package file selection
//!
//! A package's `files`/`exclude` globs are gitignore-style patterns rooted at
//! the workspace folder. Excludes win over includes.

use std::path::{Path, PathBuf};

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;

use crate::domain::value_objects::FileFilter;
use crate::error::{HoistError, HoistResult};

/// Compiled include/exclude globs for one workspace root
#[derive(Debug, Clone)]
pub struct FileMatcher {
    root: PathBuf,
    overrides: Override,
}

impl FileMatcher {
    pub fn new(root: &Path, filter: &FileFilter) -> HoistResult<Self> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in filter.include_patterns() {
            add_glob(&mut builder, pattern, pattern)?;
        }
        // later globs take precedence
        for pattern in filter.exclude_patterns() {
            add_glob(&mut builder, &format!("!{}", pattern), pattern)?;
        }

        let overrides = builder.build().map_err(|e| HoistError::InvalidPattern {
            pattern: filter.include_patterns().join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            overrides,
        })
    }

    /// Whether the root-relative file path is selected.
    ///
    /// The file does not need to exist.
    pub fn is_match(&self, relative: &str) -> bool {
        if relative.is_empty() {
            return false;
        }
        self.overrides.matched(relative, false).is_whitelist()
    }

    /// Every existing file under the root that the filter selects, sorted
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .overrides(self.overrides.clone())
            .filter_entry(|entry| entry.file_name() != ".git");

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        files.dedup();
        files
    }
}

fn add_glob(builder: &mut OverrideBuilder, glob: &str, pattern: &str) -> HoistResult<()> {
    builder
        .add(glob)
        .map(|_| ())
        .map_err(|e| HoistError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Walk `root` for `filter` off the async runtime
pub async fn find_files(root: &Path, filter: &FileFilter) -> HoistResult<Vec<PathBuf>> {
    let matcher = FileMatcher::new(root, filter)?;
    tokio::task::spawn_blocking(move || matcher.walk())
        .await
        .map_err(|e| HoistError::Io(std::io::Error::other(e.to_string())))
}
