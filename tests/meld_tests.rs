//! Meld engine tests

use spec_meld::meld::{MeldError, MeldOptions, Melder, meld_data};
use spec_meld::models::{
    BaseType, Data, DataValue, OneOf, Optional, Primitive, PrimitiveValue, Struct,
};
use spec_meld::{ContentAddressedMap, hash_data, hash_data_to_string};

fn meld_all(witnesses: impl IntoIterator<Item = Data>) -> Data {
    let mut witnesses = witnesses.into_iter();
    let mut spec = witnesses.next().expect("at least one witness");
    for witness in witnesses {
        meld_data(&mut spec, witness).unwrap();
    }
    spec
}

fn user_witness() -> Data {
    Data::structure([
        ("id", Data::of_type(BaseType::Int32)),
        ("name", Data::of_type(BaseType::String)),
        (
            "tags",
            Data::list(vec![Data::of_type(BaseType::String)]),
        ),
    ])
}

fn admin_witness() -> Data {
    Data::structure([
        ("id", Data::of_type(BaseType::Uint32)),
        ("role", Data::of_type(BaseType::String)),
        ("tags", Data::none()),
        ("score", Data::of_type(BaseType::Uint64)),
    ])
}

fn guest_witness() -> Data {
    Data::structure([
        ("id", Data::of_type(BaseType::String)),
        ("score", Data::of_type(BaseType::Int64)),
    ])
}

mod property_tests {
    use super::*;

    #[test]
    fn test_commutativity() {
        let witnesses = [user_witness(), admin_witness(), guest_witness()];
        let forward = meld_all(witnesses.clone());
        let backward = meld_all(witnesses.iter().rev().cloned());
        assert_eq!(hash_data(&forward), hash_data(&backward));

        let rotated = meld_all([guest_witness(), user_witness(), admin_witness()]);
        assert_eq!(hash_data(&forward), hash_data(&rotated));
    }

    #[test]
    fn test_idempotence() {
        let spec = meld_all([user_witness(), admin_witness(), guest_witness()]);
        let mut again = spec.clone();
        meld_data(&mut again, spec.clone()).unwrap();
        assert_eq!(hash_data(&again), hash_data(&spec));
    }

    #[test]
    fn test_melding_a_witness_twice_is_stable() {
        let once = meld_all([user_witness(), admin_witness()]);
        let twice = meld_all([user_witness(), admin_witness(), admin_witness()]);
        assert_eq!(hash_data(&once), hash_data(&twice));
    }

    #[test]
    fn test_nullability_hoisting() {
        let spec = meld_all([Data::none(), Data::of_type(BaseType::String)]);
        assert!(spec.nullable);
        match &spec.value {
            DataValue::Optional(Optional::Data(inner)) => {
                assert!(!inner.nullable);
                assert_eq!(inner.value, Data::of_type(BaseType::String).value);
            }
            other => panic!("Expected optional, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_nullable_inner_is_hoisted_through_optional() {
        let spec = meld_all([
            Data::optional(Data::of_type(BaseType::Int32)),
            Data::of_type(BaseType::Int32).with_nullable(true),
        ]);
        assert!(spec.nullable);
        match &spec.value {
            DataValue::Optional(Optional::Data(inner)) => assert!(!inner.nullable),
            other => panic!("Expected optional, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_null_then_value_is_order_sensitive() {
        let null = Data::structure([("f", Data::none())]);
        let value = Data::structure([("f", Data::of_type(BaseType::String))]);

        let null_first = meld_all([null.clone(), value.clone()]);
        let value_first = meld_all([value, null]);
        assert_ne!(hash_data(&null_first), hash_data(&value_first));

        let field = |data: &Data| match &data.value {
            DataValue::Struct(s) => s.fields["f"].clone(),
            other => panic!("Expected struct, got {}", other.kind_name()),
        };

        let wrapped = field(&null_first);
        assert!(wrapped.nullable);
        match &wrapped.value {
            DataValue::Optional(Optional::Data(inner)) => {
                assert_eq!(inner.value, Data::of_type(BaseType::String).value);
            }
            other => panic!("Expected optional, got {}", other.kind_name()),
        }

        let bare = field(&value_first);
        assert!(bare.nullable);
        assert_eq!(bare.value, Data::of_type(BaseType::String).value);
    }

    #[test]
    fn test_example_retention() {
        let spec = meld_all([
            Data::of_type(BaseType::String).with_example("c", "carol"),
            Data::of_type(BaseType::String).with_example("a", "alice"),
            Data::of_type(BaseType::String)
                .with_example("d", "dave")
                .with_example("b", "bob"),
        ]);
        let kept: Vec<(&str, &str)> = spec
            .example_values
            .iter()
            .map(|(k, v)| (k.as_str(), v.value.as_str()))
            .collect();
        assert_eq!(kept, vec![("a", "alice"), ("b", "bob")]);
    }

    #[test]
    fn test_examples_do_not_affect_identity() {
        let plain = Data::of_type(BaseType::Bool);
        let with_examples = meld_all([
            Data::of_type(BaseType::Bool).with_example("x", "true"),
            Data::of_type(BaseType::Bool).with_example("y", "false"),
        ]);
        assert_eq!(hash_data(&plain), hash_data(&with_examples));
    }
}

mod scenario_tests {
    use super::*;

    fn field<'a>(data: &'a Data, name: &str) -> &'a Data {
        match &data.value {
            DataValue::Struct(s) => &s.fields[name],
            other => panic!("Expected struct, got {}", other.kind_name()),
        }
    }

    fn unwrap_optional(data: &Data) -> &Data {
        match &data.value {
            DataValue::Optional(Optional::Data(inner)) => inner,
            other => panic!("Expected optional, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_unformatted_observation_subsumes_datetime() {
        let formatted = Data::primitive(
            Primitive::new(PrimitiveValue::from(1_700_000_000i64))
                .with_format("datetime", "unix_epoch_seconds"),
        );
        let plain = Data::primitive(Primitive::new(PrimitiveValue::from(42i64)));

        for spec in [
            meld_all([formatted.clone(), plain.clone()]),
            meld_all([plain, formatted]),
        ] {
            match &spec.value {
                DataValue::Primitive(p) => {
                    assert_eq!(p.base_type(), BaseType::Int64);
                    assert!(p.format_kind.is_empty());
                    assert!(p.formats.is_empty());
                }
                other => panic!("Expected primitive, got {}", other.kind_name()),
            }
        }
    }

    #[test]
    fn test_three_witness_user_spec() {
        let spec = meld_all([user_witness(), admin_witness(), guest_witness()]);

        // int32, uint32 and string: the integers join, the string conflicts
        match &field(&spec, "id").value {
            DataValue::OneOf(one_of) => {
                assert_eq!(one_of.options.len(), 2);
                assert!(one_of.options.check_keys().is_ok());
            }
            other => panic!("Expected oneof, got {}", other.kind_name()),
        }

        // Observed as a list and as null, absent from the guest
        let tags = field(&spec, "tags");
        assert!(tags.nullable);
        assert_eq!(unwrap_optional(tags).kind_name(), "list");

        let name = unwrap_optional(field(&spec, "name"));
        assert_eq!(name.value, Data::of_type(BaseType::String).value);

        // uint64 and int64 never join
        assert_eq!(unwrap_optional(field(&spec, "score")).kind_name(), "oneof");
    }

    #[test]
    fn test_struct_with_many_keys_becomes_map() {
        let witnesses = (0..3).map(|w| {
            Data::structure((0..40).map(move |i| {
                (
                    format!("{}", w * 40 + i),
                    Data::of_type(BaseType::Double),
                )
            }))
        });
        let spec = meld_all(witnesses);
        match &spec.value {
            DataValue::Struct(s) => {
                assert!(s.is_map());
                assert!(s.fields.is_empty());
            }
            other => panic!("Expected struct, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_map_inference_boundary_after_meld() {
        let hundred = Data::structure((0..100).map(|i| (format!("f{i}"), Data::of_type(BaseType::Int32))));
        let spec = meld_all([hundred.clone(), hundred]);
        assert_eq!(spec.kind_name(), "struct");

        let ninety_nine = Data::structure((0..99).map(|i| (format!("f{i}"), Data::of_type(BaseType::Int32))));
        let two = Data::structure([
            ("g0", Data::of_type(BaseType::Int32)),
            ("g1", Data::of_type(BaseType::Int32)),
        ]);
        let spec = meld_all([ninety_nine, two]);
        assert_eq!(spec.kind_name(), "map");
    }

    #[test]
    fn test_custom_thresholds() {
        let melder = Melder::new(MeldOptions::builder().max_optional_fields(1).build());
        let mut spec = Data::structure([("a", Data::of_type(BaseType::Bool))]);
        melder
            .meld_data(&mut spec, Data::structure([("b", Data::of_type(BaseType::Bool))]))
            .unwrap();
        assert_eq!(spec.kind_name(), "map");
    }

    #[test]
    fn test_oneof_loaded_with_foreign_keys_melds_cleanly() {
        let options: ContentAddressedMap = [
            Data::of_type(BaseType::Int64),
            Data::of_type(BaseType::Uint64),
        ]
        .into_iter()
        .collect();
        let mut json = serde_json::to_value(Data::new(DataValue::OneOf(OneOf {
            options,
            potential_conflict: true,
        })))
        .unwrap();
        let options = json["value"]["oneOf"]["options"].as_object_mut().unwrap();
        let key = options.keys().next().cloned().unwrap();
        let value = options.remove(&key).unwrap();
        options.insert("stale".to_string(), value);

        let mut spec: Data = serde_json::from_value(json).unwrap();
        meld_data(&mut spec, Data::of_type(BaseType::String)).unwrap();

        match &spec.value {
            DataValue::OneOf(one_of) => {
                assert_eq!(one_of.options.len(), 3);
                assert!(!one_of.options.contains_key("stale"));
                assert!(one_of.options.check_keys().is_ok());
            }
            other => panic!("Expected oneof, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_serde_fixture_witnesses() {
        let first: Data = serde_json::from_str(
            r#"{
                "value": {"struct": {"fields": {
                    "count": {"value": {"primitive": {"value": {"int32": 3}}}},
                    "next": {"value": {"optional": "none"}}
                }}}
            }"#,
        )
        .unwrap();
        let second: Data = serde_json::from_str(
            r#"{
                "value": {"struct": {"fields": {
                    "count": {"value": {"primitive": {"value": {"int32": 3}}}},
                    "next": {"value": {"primitive": {"value": {"string": "abc"}, "typeHint": "cursor"}}}
                }}},
                "exampleValues": {"w2": {"value": "{\"count\":3}"}}
            }"#,
        )
        .unwrap();

        let spec = meld_all([first, second]);
        let count = field(&spec, "count");
        match &count.value {
            DataValue::Primitive(p) => assert_eq!(p.value, PrimitiveValue::from(3i32)),
            other => panic!("Expected primitive, got {}", other.kind_name()),
        }

        let next = field(&spec, "next");
        assert!(next.nullable);
        match &unwrap_optional(next).value {
            DataValue::Primitive(p) => assert_eq!(p.type_hint, "cursor"),
            other => panic!("Expected primitive, got {}", other.kind_name()),
        }
        assert_eq!(spec.example_values.len(), 1);

        let json = serde_json::to_string(&spec).unwrap();
        let reparsed: Data = serde_json::from_str(&json).unwrap();
        assert_eq!(hash_data(&reparsed), hash_data(&spec));
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_error_leaves_destination_untouched() {
        let mut spec = Data::structure([
            ("ok", Data::of_type(BaseType::Int32)),
            (
                "bad",
                Data::optional(Data::optional(Data::of_type(BaseType::Bool))),
            ),
        ]);
        let before = hash_data_to_string(&spec);

        let err = meld_data(
            &mut spec,
            Data::structure([
                ("ok", Data::of_type(BaseType::Uint32)),
                ("bad", Data::of_type(BaseType::Bool)),
            ]),
        )
        .unwrap_err();

        assert_eq!(err.path(), vec!["bad"]);
        assert!(matches!(err.root_cause(), MeldError::InvalidVariant { .. }));
        assert_eq!(hash_data_to_string(&spec), before);
    }

    #[test]
    fn test_error_path_through_list() {
        let mut spec = Data::list(vec![Data::structure([(
            "inner",
            Data::optional(Data::optional(Data::of_type(BaseType::Bool))),
        )])]);
        let err = meld_data(
            &mut spec,
            Data::list(vec![Data::structure([("inner", Data::of_type(BaseType::Bool))])]),
        )
        .unwrap_err();
        assert_eq!(err.path(), vec!["[0]", "inner"]);
        assert!(err.user_message().contains("inner"));
    }

    #[test]
    fn test_struct_to_map_on_empty_struct() {
        let mut s = Struct::new();
        Melder::default().struct_to_map(&mut s).unwrap();
        let map = s.map_type.expect("converted");
        assert!(map.key.is_some());
        assert!(map.value.is_none());
    }
}
