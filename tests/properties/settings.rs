//! Property tests for settings parsing.

use proptest::prelude::*;

use hoist::infrastructure::settings::{parse_section, strip_jsonc};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: comment stripping never panics on arbitrary input.
    #[test]
    fn property_strip_jsonc_never_panics(text in "(?s).{0,256}") {
        let _ = strip_jsonc(&text);
    }

    /// PROPERTY: parsing an arbitrary document never panics.
    #[test]
    fn property_parse_section_never_panics(text in "(?s).{0,256}") {
        let _ = parse_section(&text, "deploy.reloaded");
    }

    /// PROPERTY: strings containing comment markers survive stripping.
    #[test]
    fn property_comment_markers_inside_strings_survive(body in "[a-z/*]{0,20}") {
        let text = format!("{{\"deploy.reloaded\": {{\"language\": \"{}\"}}}}", body);
        let snapshot = parse_section(&text, "deploy.reloaded").unwrap();
        prop_assert_eq!(snapshot.get("language").and_then(|v| v.as_str()), Some(body.as_str()));
    }
}
