//! Include/exclude glob sets

/// Pattern used when a filter names no files at all
pub const ALL_FILES: &str = "**/*";

/// A set of include globs with optional exclusions, relative to a workspace root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    pub files: Vec<String>,
    pub exclude: Vec<String>,
}

impl FileFilter {
    pub fn new(files: Vec<String>, exclude: Vec<String>) -> Self {
        Self { files, exclude }
    }

    /// Include patterns with blanks dropped; defaults to every file
    pub fn include_patterns(&self) -> Vec<&str> {
        let patterns: Vec<&str> = non_blank(&self.files).collect();
        if patterns.is_empty() {
            vec![ALL_FILES]
        } else {
            patterns
        }
    }

    /// Exclude patterns with blanks dropped
    pub fn exclude_patterns(&self) -> Vec<&str> {
        non_blank(&self.exclude).collect()
    }
}

fn non_blank(patterns: &[String]) -> impl Iterator<Item = &str> {
    patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_includes_everything() {
        assert_eq!(FileFilter::default().include_patterns(), vec![ALL_FILES]);
    }

    #[test]
    fn blank_patterns_are_dropped() {
        let filter = FileFilter::new(
            vec![" ".to_string(), "src/**".to_string()],
            vec!["".to_string(), "*.log".to_string()],
        );
        assert_eq!(filter.include_patterns(), vec!["src/**"]);
        assert_eq!(filter.exclude_patterns(), vec!["*.log"]);
    }
}
