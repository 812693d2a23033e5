//! Point read/write tests for ObjectValue
//!
//! Covers get/set/delete, parent creation and replacement, and field mask
//! derivation through the public API.

use docmodel::{FieldPath, MapValue, ObjectValue, Value, field_path};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;

use super::helpers::*;

// ===== BASIC OPERATIONS =====

#[test]
fn test_set_then_get_scenario() {
    let mut doc = ObjectValue::new();
    doc.set(&path("a.b"), "1".into());
    doc.set(&path("a.c"), 2.into());

    let expected = Value::Map(MapValue::new().with("b", "1").with("c", 2));
    assert_eq!(doc.get(&path("a")), Some(&expected));
    assert_eq!(doc.to_field_mask(), mask(&["a.b", "a.c"]));

    doc.delete(&path("a.b"));
    assert_eq!(doc.get(&path("a.b")), None);
    assert_eq!(
        doc.get(&path("a")),
        Some(&Value::Map(MapValue::new().with("c", 2)))
    );
}

#[test]
fn test_set_then_get_returns_value_for_random_paths() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let mut doc = random_document(&mut rng);
        let target = field_path!("a", "b", "c");
        let value = Value::Map(random_map(&mut rng, 1));

        doc.set(&target, value.clone());
        assert_eq!(doc.get(&target), Some(&value));
    }
}

#[test]
fn test_get_root_returns_whole_document() {
    let doc = doc(json!({"a": {"b": 1}, "c": true}));
    let root = doc.get(&FieldPath::empty()).unwrap();

    assert_eq!(root, &Value::Map(doc.as_map().clone()));
    assert_eq!(doc.get_cloned(&FieldPath::empty()), Some(root.clone()));
}

#[test]
fn test_get_through_leaf_is_not_found() {
    let doc = doc(json!({"a": 1, "list": [{"x": 1}]}));

    assert_eq!(doc.get(&path("a.b")), None);
    assert_eq!(doc.get(&path("list.x")), None);
    assert_eq!(doc.get(&path("missing.deeper.still")), None);
}

#[test]
fn test_set_is_idempotent() {
    let mut once = doc(json!({"a": {"x": 1}, "b": 2}));
    let mut twice = once.clone();

    once.set(&path("a.y"), "v".into());
    twice.set(&path("a.y"), "v".into());
    twice.set(&path("a.y"), "v".into());

    assert_eq!(once, twice);
    let keys: Vec<&str> = twice.get(&path("a")).unwrap().as_map().unwrap().keys().collect();
    assert_eq!(keys, vec!["x", "y"]);
}

// ===== COERCION =====

#[test]
fn test_scalar_parent_is_replaced_by_map() {
    let mut doc = ObjectValue::new();
    doc.set(&path("x"), 5.into());
    doc.set(&path("x.y"), 1.into());

    assert_eq!(
        doc.get(&path("x")),
        Some(&Value::Map(MapValue::new().with("y", 1)))
    );
}

#[test]
fn test_deep_coercion_creates_whole_chain() {
    let mut doc = doc(json!({"x": "leaf", "other": 1}));
    doc.set(&path("x.y.z"), true.into());

    assert_eq!(doc.to_json(), json!({"x": {"y": {"z": true}}, "other": 1}));
}

#[test]
fn test_array_parent_is_replaced_by_map() {
    let mut doc = doc(json!({"x": [1, 2, 3]}));
    doc.set(&path("x.0"), "first".into());

    assert_eq!(doc.to_json(), json!({"x": {"0": "first"}}));
}

// ===== DELETE =====

#[test]
fn test_delete_leaves_empty_parent_in_place() {
    let mut doc = doc(json!({"a": {"b": 1}}));
    doc.delete(&path("a.b"));

    assert_eq!(doc.to_json(), json!({"a": {}}));
    assert_eq!(doc.to_field_mask(), mask(&["a"]));
}

#[test]
fn test_delete_missing_fields_is_noop() {
    let mut doc = doc(json!({"a": 1, "b": {"c": 2}}));
    let before = doc.clone();

    doc.delete(&path("missing"));
    doc.delete(&path("missing.child"));
    doc.delete(&path("a.child"));
    doc.delete(&path("b.c.d"));

    assert_eq!(doc, before);
}

#[test]
fn test_delete_map_removes_subtree() {
    let mut doc = doc(json!({"a": {"b": {"c": 1}}, "d": 2}));
    doc.delete(&path("a.b"));

    assert_eq!(doc.to_json(), json!({"a": {}, "d": 2}));
}

// ===== FIELD MASKS =====

#[test]
fn test_field_mask_lists_leaves_and_empty_maps() {
    let doc = doc(json!({
        "a": {"b": 1, "c": {"d": null}},
        "e": {},
        "f": [1, {"g": 2}],
        "h": {"i": {}}
    }));

    assert_eq!(doc.to_field_mask(), mask(&["a.b", "a.c.d", "e", "f", "h.i"]));
}

#[test]
fn test_set_empty_map_is_preserved_in_mask() {
    let mut doc = ObjectValue::new();
    doc.set(&path("a.b"), Value::empty_map());

    assert!(doc.to_field_mask().contains(&path("a.b")));
}

#[test]
fn test_field_mask_covers_every_stored_leaf() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..100 {
        let doc = random_document(&mut rng);
        let fields = doc.to_field_mask();

        for field in &fields {
            let value = doc.get(field).expect("mask entries must resolve");
            if let Value::Map(map) = value {
                assert!(map.is_empty(), "only empty maps appear in the mask");
            }
        }
    }
}

#[test]
fn test_documents_with_empty_keys_are_rejected() {
    let err = ObjectValue::from_json_str(r#"{"": 1, "a": 2}"#).unwrap_err();
    assert!(err.is_path_error());

    let err = ObjectValue::from_json(json!({"x": {"": 1}})).unwrap_err();
    assert!(err.is_path_error());

    let result: Result<ObjectValue, _> = serde_json::from_str(r#"{"Map":{"":"Null"}}"#);
    assert!(result.is_err());
}

#[test]
fn test_field_mask_of_merged_odd_keys() {
    let source = doc(json!({"x": {" ": 1, "a.b": {"`": 2}}}));
    let mut target = doc(json!({"x": 5}));

    target.set_all(&source.to_field_mask(), &source);

    let fields = target.to_field_mask();
    assert_eq!(fields.to_string(), "{x.` `, x.`a.b`.`\\``}");
    assert_eq!(target, source);
}

#[test]
fn test_field_mask_segments_are_quoted_in_display() {
    let doc = doc(json!({"first.name": 1, "plain": {"with space": 2}}));
    assert_eq!(
        doc.to_field_mask().to_string(),
        "{`first.name`, plain.`with space`}"
    );
}

// ===== SERIALIZATION =====

#[test]
fn test_serde_round_trip_keeps_leaf_types() {
    let mut doc = doc(json!({"a": {"b": 1.5}}));
    doc.set(&path("a.bytes"), Value::Bytes(vec![1, 2, 3]));
    doc.set(&path("ref"), Value::Reference("projects/p/databases/d".into()));

    let encoded = serde_json::to_string(&doc).unwrap();
    let decoded: ObjectValue = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn test_serde_rejects_non_map_root() {
    let result: Result<ObjectValue, _> = serde_json::from_str(r#"{"Integer":1}"#);
    assert!(result.is_err());
}
