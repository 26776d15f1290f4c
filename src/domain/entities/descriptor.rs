//! Package and target descriptors
//!
//! Declarative objects copied out of a configuration snapshot. Each copy
//! carries four derived fields assigned at extraction time: its position in
//! the declaration list, a weak link to the owning workspace root, a
//! composite identity and a normalized search key.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

use crate::domain::entities::WorkspaceRoot;
use crate::domain::value_objects::FileFilter;

/// Distinguishes package declarations from target declarations
pub trait DescriptorKind: Send + Sync + 'static {
    /// Snapshot key holding the declaration list
    const CONFIG_KEY: &'static str;
    /// Prefix of the generated name for unnamed entries
    const LABEL: &'static str;
}

/// Marker for `packages` declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageKind;

/// Marker for `targets` declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetKind;

impl DescriptorKind for PackageKind {
    const CONFIG_KEY: &'static str = "packages";
    const LABEL: &'static str = "Package";
}

impl DescriptorKind for TargetKind {
    const CONFIG_KEY: &'static str = "targets";
    const LABEL: &'static str = "Target";
}

/// A package or target declaration with its derived fields
pub struct Descriptor<K: DescriptorKind> {
    pub(crate) declaration: Map<String, Value>,
    pub(crate) index: usize,
    pub(crate) owner: Weak<WorkspaceRoot>,
    pub(crate) identity: String,
    pub(crate) search_key: String,
    _kind: PhantomData<K>,
}

/// A set of files and the targets they go to
pub type Package = Descriptor<PackageKind>;

/// A remote location files are deployed to
pub type Target = Descriptor<TargetKind>;

/// Normalize a name for comparison: trimmed and lower-cased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<K: DescriptorKind> Descriptor<K> {
    /// A descriptor with no derived fields yet
    pub(crate) fn from_declaration(declaration: Map<String, Value>) -> Self {
        Self {
            declaration,
            index: 0,
            owner: Weak::new(),
            identity: String::new(),
            search_key: String::new(),
            _kind: PhantomData,
        }
    }

    /// The raw declaration as written in the settings
    pub fn declaration(&self) -> &Map<String, Value> {
        &self.declaration
    }

    /// Zero-based position in the snapshot's declaration list
    pub fn index(&self) -> usize {
        self.index
    }

    /// Owning workspace root, if it is still alive
    pub fn owner(&self) -> Option<Arc<WorkspaceRoot>> {
        self.owner.upgrade()
    }

    /// Composite identity, unique across all workspaces
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Normalized name used for user-facing lookups
    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    /// Declared name, or a generated `"<Label> #<n>"` for unnamed entries
    pub fn name(&self) -> String {
        match self.get_str("name") {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("{} #{}", K::LABEL, self.index + 1),
        }
    }

    /// Human readable description, if any
    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    /// String value of a declaration field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.declaration.get(key).and_then(Value::as_str)
    }

    /// Boolean value of a declaration field; absent or non-boolean is false
    pub fn get_bool(&self, key: &str) -> bool {
        self.declaration
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// A field holding a string or a list of strings
    pub fn get_list(&self, key: &str) -> Vec<String> {
        string_list(self.declaration.get(key))
    }

    /// Whether this entry answers to `name` (compared normalized)
    pub fn matches_name(&self, name: &str) -> bool {
        self.search_key == normalize_name(name)
    }
}

/// When a saved file triggers a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOnSave {
    /// Never on save
    Disabled,
    /// To the package's own targets
    PackageTargets,
    /// To an explicit list of target names
    Targets(Vec<String>),
}

impl Descriptor<PackageKind> {
    /// Files of this package
    pub fn filter(&self) -> FileFilter {
        FileFilter::new(self.get_list("files"), self.get_list("exclude"))
    }

    /// Names of the targets this package deploys to
    pub fn target_names(&self) -> Vec<String> {
        self.get_list("targets")
    }

    /// Deploy files of this package when they change on disk
    pub fn deploy_on_change(&self) -> bool {
        self.get_bool("deployOnChange")
    }

    /// Delete files of this package from targets when removed locally
    pub fn remove_on_change(&self) -> bool {
        self.get_bool("removeOnChange")
    }

    pub fn deploy_on_save(&self) -> DeployOnSave {
        match self.declaration.get("deployOnSave") {
            Some(Value::Bool(true)) => DeployOnSave::PackageTargets,
            Some(value @ (Value::String(_) | Value::Array(_))) => {
                let names = string_list(Some(value));
                if names.is_empty() {
                    DeployOnSave::Disabled
                } else {
                    DeployOnSave::Targets(names)
                }
            }
            _ => DeployOnSave::Disabled,
        }
    }
}

impl Descriptor<TargetKind> {
    /// Plugin type (`type` field, normalized); defaults to `local`
    pub fn target_type(&self) -> String {
        match self.get_str("type") {
            Some(kind) if !kind.trim().is_empty() => normalize_name(kind),
            _ => "local".to_string(),
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

impl<K: DescriptorKind> Clone for Descriptor<K> {
    fn clone(&self) -> Self {
        Self {
            declaration: self.declaration.clone(),
            index: self.index,
            owner: self.owner.clone(),
            identity: self.identity.clone(),
            search_key: self.search_key.clone(),
            _kind: PhantomData,
        }
    }
}

/// Structural equality; owners compare by reference
impl<K: DescriptorKind> PartialEq for Descriptor<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.identity == other.identity
            && self.search_key == other.search_key
            && self.declaration == other.declaration
            && Weak::ptr_eq(&self.owner, &other.owner)
    }
}

impl<K: DescriptorKind> fmt::Debug for Descriptor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::LABEL)
            .field("index", &self.index)
            .field("identity", &self.identity)
            .field("search_key", &self.search_key)
            .field("declaration", &self.declaration)
            .finish()
    }
}
