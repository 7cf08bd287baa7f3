//! Projection laws: idempotence, identity on empty selections, and no
//! invented data.

use gplay::projection::{project, FieldSelection};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::from(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[abc0]", inner), 0..5).prop_map(|entries| {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}

fn field_spec() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        Just("0".to_string()),
        Just("*".to_string()),
    ];
    let path = prop::collection::vec(segment, 1..4).prop_map(|segments| segments.join("."));
    prop::collection::vec(path, 0..4).prop_map(|paths| paths.join(","))
}

/// Every leaf of `projected` exists at the same place in `original`.
fn is_sub_tree(projected: &Value, original: &Value) -> bool {
    match (projected, original) {
        (Value::Object(p), Value::Object(o)) => p
            .iter()
            .all(|(key, value)| o.get(key).is_some_and(|orig| is_sub_tree(value, orig))),
        (Value::Array(p), Value::Array(o)) => p.len() <= o.len(),
        (p, o) => p == o,
    }
}

proptest! {
    #[test]
    fn projection_is_idempotent(value in json_value(), spec in field_spec()) {
        let selection = FieldSelection::parse(&spec);
        let once = project(&value, &selection);
        let twice = project(&once, &selection);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn empty_selection_is_identity(value in json_value(), commas in "[, ]{0,4}") {
        let selection = FieldSelection::parse(&commas);
        prop_assert!(selection.is_empty());
        prop_assert_eq!(project(&value, &selection), value);
    }

    #[test]
    fn projection_never_invents_keys(value in json_value(), spec in field_spec()) {
        let selection = FieldSelection::parse(&spec);
        let projected = project(&value, &selection);
        if value.is_object() && !selection.is_empty() {
            prop_assert!(is_sub_tree(&projected, &value));
        }
    }
}
