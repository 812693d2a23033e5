//! Field-mask merge tests for ObjectValue::set_all
//!
//! The batched merge must leave every document exactly as applying the mask
//! one field at a time would.

use docmodel::{FieldMask, ObjectValue, Value};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;

use super::helpers::*;

#[test]
fn test_merge_into_empty_document() {
    let source = doc(json!({"a": {"b": 1, "c": "x"}, "d": true}));
    let mut target = ObjectValue::new();

    target.set_all(&source.to_field_mask(), &source);

    assert_eq!(target, source);
}

#[test]
fn test_merge_treats_missing_source_fields_as_deletes() {
    let mut target = doc(json!({"a": {"b": 1, "c": 2}, "d": 3}));
    let source = doc(json!({"a": {"c": 20}}));

    target.set_all(&mask(&["a.b", "a.c", "d"]), &source);

    assert_eq!(target.to_json(), json!({"a": {"c": 20}}));
}

#[test]
fn test_merge_leaves_unmasked_fields_alone() {
    let mut target = doc(json!({"a": {"b": 1, "keep": 2}, "other": 3}));
    let source = doc(json!({"a": {"b": 10, "keep": 20}, "other": 30}));

    target.set_all(&mask(&["a.b"]), &source);

    assert_eq!(target.to_json(), json!({"a": {"b": 10, "keep": 2}, "other": 3}));
}

#[test]
fn test_merge_whole_map_replaces_subtree() {
    let mut target = doc(json!({"a": {"old": 1}}));
    let source = doc(json!({"a": {"new": 2}}));

    target.set_all(&mask(&["a"]), &source);

    assert_eq!(target.to_json(), json!({"a": {"new": 2}}));
}

#[test]
fn test_merge_preserves_empty_maps_from_source() {
    let mut target = doc(json!({"a": {"b": 1}}));
    let source = doc(json!({"a": {}, "e": {}}));

    target.set_all(&source.to_field_mask(), &source);

    assert_eq!(target.to_json(), json!({"a": {}, "e": {}}));
}

#[test]
fn test_merge_coerces_scalar_parent_for_inserts() {
    let mut target = doc(json!({"x": 5}));
    let source = doc(json!({"x": {"y": 1}}));

    target.set_all(&mask(&["x.y"]), &source);

    assert_eq!(target.to_json(), json!({"x": {"y": 1}}));
}

#[test]
fn test_merge_delete_only_groups_leave_missing_parents_absent() {
    let mut target = doc(json!({"x": 5}));
    let source = ObjectValue::new();

    target.set_all(&mask(&["missing.a", "missing.b", "x.y"]), &source);

    assert_eq!(target.to_json(), json!({"x": 5}));
}

#[test]
fn test_merge_with_parent_and_child_in_mask() {
    let mut target = doc(json!({"a": {"b": {"c": 1}, "d": 2}}));
    let source = doc(json!({"a": {"b": 7}}));
    let fields = mask(&["a.b", "a.b.c", "a.d"]);

    let mut expected = target.clone();
    naive_set_all(&mut expected, &fields, &source);
    target.set_all(&fields, &source);

    assert_eq!(target, expected);
    // `a.b.c` resolves through the leaf `a.b` to nothing, so its delete is a no-op
    assert_eq!(target.to_json(), json!({"a": {"b": 7}}));
}

#[test]
fn test_merge_keeps_existing_field_positions() {
    let mut target = doc(json!({"m": {"a": 1, "b": 2, "c": 3}}));
    let source = doc(json!({"m": {"b": 20, "z": 26}}));

    target.set_all(&mask(&["m.a", "m.b", "m.z"]), &source);

    let keys: Vec<&str> = target
        .get(&path("m"))
        .and_then(Value::as_map)
        .unwrap()
        .keys()
        .collect();
    assert_eq!(keys, vec!["b", "c", "z"]);
}

#[test]
fn test_merge_matches_field_by_field_application() {
    let mut rng = StdRng::seed_from_u64(0xd0c);

    for _ in 0..500 {
        let target = random_document(&mut rng);
        let source = random_document(&mut rng);
        let fields = random_mask(&mut rng, &target, &source);

        let mut batched = target.clone();
        batched.set_all(&fields, &source);

        let mut naive = target.clone();
        naive_set_all(&mut naive, &fields, &source);

        assert_eq!(
            batched, naive,
            "merge diverged\n target: {target}\n source: {source}\n mask: {fields}"
        );
    }
}

#[test]
fn test_merge_from_empty_document_matches_source() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let source = random_document(&mut rng);
        let mut target = ObjectValue::new();
        target.set_all(&source.to_field_mask(), &source);
        assert_eq!(target, source);
    }
}

#[test]
fn test_merge_with_empty_mask_changes_nothing() {
    let mut target = doc(json!({"a": 1}));
    let before = target.clone();

    target.set_all(&FieldMask::new(), &doc(json!({"a": 2})));

    assert_eq!(target, before);
}
