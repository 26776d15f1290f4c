//! Property tests for workspace-relative path math.

use proptest::prelude::*;

use hoist::domain::value_objects::path::{
    resolve, split_name_and_path, to_full_path, to_workspace_relative,
};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9_.-]{0,8}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn relative_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..=5).prop_map(|parts| parts.join("/"))
}

fn root() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..=3).prop_map(|parts| format!("/{}", parts.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: full path and relative path are inverse of each other.
    #[test]
    fn property_relative_full_round_trip(root in root(), rel in relative_path()) {
        let full = to_full_path(&rel, &root).unwrap();
        prop_assert_eq!(to_workspace_relative(&full, &root), Some(rel));
    }

    /// PROPERTY: resolving twice changes nothing.
    #[test]
    fn property_resolve_is_idempotent(path in "(?s)[A-Za-z./\\\\:]{0,40}") {
        let once = resolve(&path, "/base");
        prop_assert_eq!(resolve(&once, "/base"), once.clone());
    }

    /// PROPERTY: a sibling folder sharing the root as a string prefix is never inside.
    #[test]
    fn property_sibling_prefix_is_outside(root in root(), suffix in segment(), rel in relative_path()) {
        let sibling = format!("{}{}/{}", root, suffix, rel);
        prop_assert_eq!(to_workspace_relative(&sibling, &root), None);
    }

    /// PROPERTY: backslashes and slashes are interchangeable.
    #[test]
    fn property_separators_are_equivalent(root in root(), rel in relative_path()) {
        let forward = format!("{}/{}", root, rel);
        let backward = forward.replace('/', "\\");
        prop_assert_eq!(
            to_workspace_relative(&backward, &root),
            to_workspace_relative(&forward, &root)
        );
    }

    /// PROPERTY: name and directory rejoin to the relative path.
    #[test]
    fn property_name_and_path_rejoin(root in root(), rel in relative_path()) {
        let full = format!("{}/{}", root, rel);
        let split = split_name_and_path(&full, &root).unwrap();
        let rejoined = if split.path.is_empty() {
            split.name.clone()
        } else {
            format!("{}/{}", split.path, split.name)
        };
        prop_assert_eq!(rejoined, rel);
        prop_assert!(!split.name.contains('/'));
    }
}
