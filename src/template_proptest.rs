//! Property-based tests for template resolution.
//!
//! These tests use proptest to generate random field values and verify
//! that the round-trip and rendering invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::key::{FieldValue, Fields, KeyKind, KeyRef, TemplateKey};
    use crate::scan;
    use crate::template::{TemplatePath, TemplateString};
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn shot_keys() -> BTreeMap<String, KeyRef> {
        let mut keys: BTreeMap<String, KeyRef> = BTreeMap::new();
        keys.insert(
            "Shot".to_string(),
            Arc::new(TemplateKey::new("Shot", KeyKind::String)),
        );
        keys.insert(
            "version".to_string(),
            Arc::new(TemplateKey::new(
                "version",
                KeyKind::Integer { padding: Some(3) },
            )),
        );
        keys.insert(
            "seq_num".to_string(),
            Arc::new(TemplateKey::new("seq_num", KeyKind::Sequence { padding: 5 })),
        );
        keys
    }

    fn shot_template() -> TemplatePath {
        TemplatePath::new(
            "shot_file",
            "{Shot}/v{version}/filename.{seq_num}",
            &shot_keys(),
            "primary",
            Some(PathBuf::from("/mnt/projects/demo")),
        )
        .unwrap()
    }

    fn fields_for(shot: &str, version: i64, seq_num: i64) -> Fields {
        let mut fields = Fields::new();
        fields.insert("Shot".to_string(), FieldValue::Str(shot.to_string()));
        fields.insert("version".to_string(), FieldValue::Int(version));
        fields.insert("seq_num".to_string(), FieldValue::Int(seq_num));
        fields
    }

    proptest! {
        /// Property: fields applied to a path template come back unchanged
        /// through get_fields, for any valid field mapping.
        #[test]
        fn round_trip_preserves_fields(
            shot in "[a-zA-Z][a-zA-Z0-9_]{0,15}",
            version in 0i64..100_000,
            seq_num in 0i64..1_000_000,
        ) {
            let template = shot_template();
            let fields = fields_for(&shot, version, seq_num);
            let path = template.apply_fields(&fields).unwrap();
            let recovered = template.get_fields(&path);
            prop_assert_eq!(recovered, Some(fields));
        }

        /// Property: applying then re-applying recovered fields yields the
        /// identical path (render stability).
        #[test]
        fn re_render_is_stable(
            shot in "[a-zA-Z][a-zA-Z0-9_]{0,15}",
            version in 0i64..100_000,
            seq_num in 0i64..1_000_000,
        ) {
            let template = shot_template();
            let fields = fields_for(&shot, version, seq_num);
            let first = template.apply_fields(&fields).unwrap();
            let recovered = template.get_fields(&first).unwrap();
            let second = template.apply_fields(&recovered).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: zero-padded rendering never shortens a number and
        /// always reaches the configured width.
        #[test]
        fn padding_reaches_width(version in 0i64..10_000_000) {
            let key = TemplateKey::new("version", KeyKind::Integer { padding: Some(3) });
            let rendered = key.str_from_value(&FieldValue::Int(version)).unwrap();
            prop_assert!(rendered.len() >= 3);
            prop_assert_eq!(rendered.parse::<i64>().unwrap(), version);
        }

        /// Property: validation agrees with rendering; a field mapping
        /// that validates always renders without error.
        #[test]
        fn validate_implies_render(
            shot in "[a-zA-Z][a-zA-Z0-9_]{0,15}",
            version in 0i64..100_000,
            seq_num in 0i64..1_000_000,
        ) {
            let template = shot_template();
            let fields = fields_for(&shot, version, seq_num);
            prop_assert!(template.validate(&fields));
            prop_assert!(template.apply_fields(&fields).is_ok());
        }

        /// Property: skipping any single key puts at least one `*` in the
        /// glob pattern, and never erases the literal filename prefix.
        #[test]
        fn skipped_key_widens_glob(
            shot in "[a-zA-Z][a-zA-Z0-9_]{0,15}",
            version in 0i64..100_000,
            seq_num in 0i64..1_000_000,
            skip_index in 0usize..3,
        ) {
            let template = shot_template();
            let fields = fields_for(&shot, version, seq_num);
            let skip_name = ["Shot", "version", "seq_num"][skip_index];
            let pattern = scan::glob_pattern(&template, &fields, &[skip_name]).unwrap();
            let pattern = pattern.to_str().unwrap().to_string();
            prop_assert!(pattern.contains('*'));
            prop_assert!(pattern.contains("filename."));
        }

        /// Property: string templates round-trip too.
        #[test]
        fn string_template_round_trip(
            name in "[a-zA-Z][a-zA-Z0-9_ ]{0,15}",
            version in 0i64..100_000,
        ) {
            let mut keys: BTreeMap<String, KeyRef> = BTreeMap::new();
            keys.insert(
                "name".to_string(),
                Arc::new(TemplateKey::new("name", KeyKind::String)),
            );
            keys.insert(
                "version".to_string(),
                Arc::new(TemplateKey::new("version", KeyKind::Integer { padding: Some(2) })),
            );
            let template = TemplateString::new("publish", "{name}, v{version}", &keys).unwrap();

            let mut fields = Fields::new();
            fields.insert("name".to_string(), FieldValue::Str(name));
            fields.insert("version".to_string(), FieldValue::Int(version));
            let rendered = template.apply_fields(&fields).unwrap();
            prop_assert_eq!(template.get_fields(&rendered), Some(fields));
        }
    }
}
