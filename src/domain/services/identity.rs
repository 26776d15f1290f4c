//! Identity Assignment
//!
//! Extracts package/target declarations from a snapshot and stamps each copy
//! with `index`, owner, `identity` and `search_key`, in that order: the
//! identity is built from the index and the owning workspace, so both must be
//! in place first.
//!
//! Identities have the form
//! `"<workspace id>\n<index>\n<normalized name>\n<settings file>"`.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::entities::{normalize_name, Descriptor, DescriptorKind, WorkspaceRoot};
use crate::domain::value_objects::{ConfigSnapshot, ConfigSource};

/// Derive fresh descriptors of kind `K` from `snapshot`.
///
/// Non-object entries are skipped and do not consume an index. Every call
/// deep-copies the declarations, so callers may mutate the result freely.
pub fn assign_identities<K: DescriptorKind>(
    snapshot: &ConfigSnapshot,
    owner: &Arc<WorkspaceRoot>,
    source: &ConfigSource,
) -> Vec<Descriptor<K>> {
    snapshot
        .declarations(K::CONFIG_KEY)
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(map) => Some(map.clone()),
            _ => None,
        })
        .enumerate()
        .map(|(index, declaration)| {
            let mut descriptor = Descriptor::<K>::from_declaration(declaration);
            descriptor.index = index;
            descriptor.owner = Arc::downgrade(owner);
            // needs index and owner
            descriptor.identity = identity_of(owner, &descriptor, source);
            descriptor.search_key = normalize_name(&descriptor.name());
            descriptor
        })
        .collect()
}

/// Identity of `descriptor` as seen from `workspace`.
///
/// Ownership is not checked here; see `Workspace::package_id`.
pub fn identity_of<K: DescriptorKind>(
    workspace: &WorkspaceRoot,
    descriptor: &Descriptor<K>,
    source: &ConfigSource,
) -> String {
    compose_identity(
        workspace.id().as_str(),
        descriptor.index(),
        &descriptor.name(),
        &source.resource().to_string_lossy(),
    )
}

/// Join the identity components with newlines
pub fn compose_identity(workspace_id: &str, index: usize, name: &str, resource: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        workspace_id,
        index,
        normalize_name(name),
        resource
    )
}
