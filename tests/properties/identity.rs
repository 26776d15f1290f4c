//! Property tests for descriptor identities.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use hoist::domain::entities::PackageKind;
use hoist::domain::services::assign_identities;
use hoist::{ConfigSnapshot, ConfigSource, Package, WorkspaceId, WorkspaceRoot};

fn declarations() -> impl Strategy<Value = Vec<Option<String>>> {
    proptest::collection::vec(proptest::option::of("[ A-Za-z]{0,6}"), 0..=8)
}

fn snapshot(names: &[Option<String>]) -> ConfigSnapshot {
    let packages: Vec<Value> = names
        .iter()
        .map(|name| match name {
            Some(name) => json!({ "name": name }),
            None => json!({}),
        })
        .collect();
    ConfigSnapshot::from_value(json!({ "packages": packages }))
}

fn packages(id: &str, names: &[Option<String>]) -> Vec<Package> {
    let root = Arc::new(WorkspaceRoot::new(WorkspaceId::new(id), "/proj"));
    let source = ConfigSource::default_for(root.folder());
    assign_identities::<PackageKind>(&snapshot(names), &root, &source)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: identities within one workspace are unique, even for equal names.
    #[test]
    fn property_identities_are_unique(names in declarations()) {
        let packages = packages("ws0", &names);
        let ids: HashSet<&str> = packages.iter().map(|p| p.identity()).collect();
        prop_assert_eq!(ids.len(), packages.len());
    }

    /// PROPERTY: deriving twice from the same snapshot yields the same identities.
    #[test]
    fn property_identities_are_stable(names in declarations()) {
        let first: Vec<String> = packages("ws0", &names).iter().map(|p| p.identity().to_string()).collect();
        let second: Vec<String> = packages("ws0", &names).iter().map(|p| p.identity().to_string()).collect();
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: the same declaration in two workspaces never collides.
    #[test]
    fn property_workspaces_never_collide(names in declarations()) {
        let a = packages("ws0", &names);
        let b = packages("ws1", &names);
        for (left, right) in a.iter().zip(b.iter()) {
            prop_assert_ne!(left.identity(), right.identity());
        }
    }

    /// PROPERTY: indices are dense and follow declaration order.
    #[test]
    fn property_indices_are_dense(names in declarations()) {
        let packages = packages("ws0", &names);
        for (expected, package) in packages.iter().enumerate() {
            prop_assert_eq!(package.index(), expected);
        }
    }
}
