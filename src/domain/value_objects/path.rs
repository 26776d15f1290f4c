//! Workspace Path Resolution
//!
//! Pure string math over paths: separator normalization, lexical resolution,
//! and containment relative to a workspace root.
//!
//! All comparisons are case-sensitive and operate on a separator-uniform form
//! in which both `\` and `/` become `/`. Relative results never carry a leading
//! or trailing slash, and the empty string denotes the root itself.

use std::path::Path;

/// A file split into its final segment and its containing directory
/// (relative to the workspace root, empty when directly in the root).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameAndPath {
    pub name: String,
    pub path: String,
}

/// Convert every path separator to `/`
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a `Path` into the separator-uniform string form
pub fn path_to_string(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Check whether a path is absolute in POSIX (`/x`), UNC (`//host`)
/// or drive-letter (`C:/x`) form
pub fn is_absolute(path: &str) -> bool {
    let path = normalize_separators(path);
    path.starts_with('/') || drive_prefix_len(&path).is_some()
}

/// Lexically resolve `path` to an absolute, normalized form.
///
/// Relative paths are joined onto `base` first. `.` segments and duplicate
/// separators are dropped and `..` pops the previous segment (never above the
/// root). No trailing slash is kept except for a bare root.
pub fn resolve(path: &str, base: &str) -> String {
    let path = normalize_separators(path);
    let joined = if is_absolute(&path) || base.is_empty() {
        path
    } else {
        format!("{}/{}", normalize_separators(base), path)
    };

    let (prefix, rest) = split_root(&joined);
    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("{}{}", prefix, segments.join("/"))
}

/// Path of `path` relative to `root`, or `None` when it is not contained.
///
/// Both inputs are resolved first; a relative `path` resolves against `root`.
/// Containment is segment-aware: `/proj2/a` is not inside `/proj`.
pub fn to_workspace_relative(path: &str, root: &str) -> Option<String> {
    let root = resolve(root, "");
    let path = resolve(path, &root);
    strip_root(&path, &root).map(|rel| rel.trim_matches('/').to_string())
}

/// Inverse of [`to_workspace_relative`]: the resolved absolute form of `path`,
/// provided it lies inside `root`
pub fn to_full_path(path: &str, root: &str) -> Option<String> {
    let relative = to_workspace_relative(path, root)?;
    let root = resolve(root, "");
    if relative.is_empty() {
        return Some(root);
    }
    Some(join(&root, &relative))
}

/// Split a file into name and root-relative directory.
///
/// Returns `None` for files outside the root and for the root itself.
pub fn split_name_and_path(file: &str, root: &str) -> Option<NameAndPath> {
    let relative = to_workspace_relative(file, root)?;
    if relative.is_empty() {
        return None;
    }

    let (path, name) = match relative.rsplit_once('/') {
        Some((dir, name)) => (dir.trim_matches('/').to_string(), name.to_string()),
        None => (String::new(), relative),
    };
    Some(NameAndPath { name, path })
}

/// Check whether `path` lies in the settings directory.
///
/// Non-absolute paths cannot be located reliably and count as inside, which
/// keeps them away from auto-deploy.
pub fn is_inside_settings_folder(path: &str, settings_dir: &str) -> bool {
    if !is_absolute(path) {
        return true;
    }
    let dir = resolve(settings_dir, "");
    let path = resolve(path, "");
    strip_root(&path, &dir).is_some()
}

/// Check whether `path` is `dir` itself or below it (both already resolved)
fn strip_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    if path == root {
        return Some("");
    }
    if root.ends_with('/') {
        // bare root such as "/" or "C:/"
        return path.strip_prefix(root);
    }
    path.strip_prefix(root)?.strip_prefix('/')
}

fn join(root: &str, relative: &str) -> String {
    if root.ends_with('/') {
        format!("{}{}", root, relative)
    } else {
        format!("{}/{}", root, relative)
    }
}

/// Split a separator-normalized path into its root prefix and the remainder
fn split_root(path: &str) -> (String, &str) {
    if let Some(rest) = path.strip_prefix("//") {
        return ("//".to_string(), rest);
    }
    if let Some(rest) = path.strip_prefix('/') {
        return ("/".to_string(), rest);
    }
    if let Some(len) = drive_prefix_len(path) {
        let drive = &path[..2];
        return (format!("{}/", drive), &path[len..]);
    }
    (String::new(), path)
}

/// Length of a `C:/` style prefix, if present
fn drive_prefix_len(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
    {
        return Some(3);
    }
    None
}
