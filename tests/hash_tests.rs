//! Canonical hashing tests

use spec_meld::hash::objecthash::{hash_int, hash_str, normalize_float};
use spec_meld::models::{
    BaseType, Data, DataMeta, DataValue, HttpLocation, OneOf, Primitive, PrimitiveValue,
};
use spec_meld::{ContentAddressedMap, hash_data, hash_data_to_string};

mod stability_tests {
    use super::*;

    fn sample() -> Data {
        Data::structure([
            ("id", Data::of_type(BaseType::Int64)),
            (
                "tags",
                Data::list(vec![Data::of_type(BaseType::String)]),
            ),
            ("deleted", Data::optional(Data::of_type(BaseType::Bool))),
        ])
        .with_meta(DataMeta::response(HttpLocation::body("application/json"), 200))
    }

    #[test]
    fn test_repeated_hashing_is_identical() {
        let data = sample();
        let first = hash_data_to_string(&data);
        for _ in 0..5 {
            assert_eq!(hash_data_to_string(&data), first);
        }
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_construction_order_does_not_matter() {
        let forward = Data::structure([
            ("a", Data::of_type(BaseType::Int32)),
            ("b", Data::of_type(BaseType::String)),
        ]);
        let backward = Data::structure([
            ("b", Data::of_type(BaseType::String)),
            ("a", Data::of_type(BaseType::Int32)),
        ]);
        assert_eq!(hash_data(&forward), hash_data(&backward));

        let options = |items: Vec<Data>| {
            Data::new(DataValue::OneOf(OneOf {
                options: items.into_iter().collect(),
                potential_conflict: true,
            }))
        };
        let one = options(vec![
            Data::of_type(BaseType::Bool),
            Data::of_type(BaseType::Bytes),
        ]);
        let two = options(vec![
            Data::of_type(BaseType::Bytes),
            Data::of_type(BaseType::Bool),
        ]);
        assert_eq!(hash_data(&one), hash_data(&two));
    }

    #[test]
    fn test_serde_round_trip_preserves_hash() {
        let data = sample().with_example("k", "{\"id\":1}");
        let json = serde_json::to_string(&data).unwrap();
        let back: Data = serde_json::from_str(&json).unwrap();
        assert_eq!(hash_data(&back), hash_data(&data));
    }
}

mod identity_tests {
    use super::*;

    #[test]
    fn test_base_types_hash_differently() {
        let hashes: Vec<String> = BaseType::ALL
            .iter()
            .map(|t| hash_data_to_string(&Data::of_type(*t)))
            .collect();
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_integer_and_string_are_separated() {
        assert_ne!(hash_int(1), hash_str("1"));

        let int = Data::primitive(Primitive::new(PrimitiveValue::from(1i64)));
        let string = Data::primitive(Primitive::new(PrimitiveValue::from("1")));
        assert_ne!(hash_data(&int), hash_data(&string));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        assert_eq!(normalize_float(-0.0), normalize_float(0.0));
        let neg = Data::primitive(Primitive::new(PrimitiveValue::from(-0.0f64)));
        let pos = Data::of_type(BaseType::Double);
        assert_eq!(hash_data(&neg), hash_data(&pos));
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(normalize_float(f64::NAN), "NaN");
        assert_eq!(normalize_float(f64::INFINITY), "Infinity");
        assert_eq!(normalize_float(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(normalize_float(1.0), "+0:1");
    }

    #[test]
    fn test_formats_change_identity() {
        let plain = Data::of_type(BaseType::String);
        let formatted =
            Data::primitive(Primitive::of_type(BaseType::String).with_format("id", "uuid"));
        let hinted = Data::primitive(Primitive::of_type(BaseType::String).with_type_hint("token"));
        assert_ne!(hash_data(&plain), hash_data(&formatted));
        assert_ne!(hash_data(&plain), hash_data(&hinted));
        assert_ne!(hash_data(&formatted), hash_data(&hinted));
    }

    #[test]
    fn test_map_keys_follow_content() {
        let mut map = ContentAddressedMap::new();
        let key = map.insert(Data::of_type(BaseType::Uint64));
        assert_eq!(key, hash_data_to_string(&Data::of_type(BaseType::Uint64)));

        let again = map.insert(Data::of_type(BaseType::Uint64).with_example("a", "7"));
        assert_eq!(key, again);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&key).map(|d| d.example_values.len()), Some(1));
    }
}
