use docmodel::{
    FieldMask, FieldPath, MapValue, ObjectValue, Value,
    model::{GeoPoint, Timestamp},
};
use rand::{Rng, rngs::StdRng};

/// Keys used by generated documents; small so that documents collide often
pub const KEYS: &[&str] = &["a", "b", "c", "d"];

/// Build a document from a JSON literal, panicking if it is not an object
pub fn doc(json: serde_json::Value) -> ObjectValue {
    ObjectValue::from_json(json).expect("test document must be a JSON object")
}

/// Build a path from a dotted string
pub fn path(dotted: &str) -> FieldPath {
    FieldPath::from_dot_separated(dotted).expect("test path must be valid")
}

/// Build a mask from dotted strings
pub fn mask(paths: &[&str]) -> FieldMask {
    paths.iter().map(|p| path(p)).collect()
}

/// Apply a mask one field at a time; the reference behavior for `set_all`
pub fn naive_set_all(target: &mut ObjectValue, mask: &FieldMask, source: &ObjectValue) {
    for field in mask {
        match source.get(field) {
            Some(value) => target.set(field, value.clone()),
            None => target.delete(field),
        }
    }
}

fn random_leaf(rng: &mut StdRng) -> Value {
    match rng.gen_range(0..7) {
        0 => Value::Null,
        1 => Value::Boolean(rng.gen_bool(0.5)),
        2 => Value::Integer(rng.gen_range(-5..5)),
        3 => Value::String(KEYS[rng.gen_range(0..KEYS.len())].to_string()),
        4 => Value::Timestamp(Timestamp::new(rng.gen_range(0..100), 0)),
        5 => Value::GeoPoint(GeoPoint::new(1.0, 2.0)),
        _ => Value::Array(vec![Value::Integer(rng.gen_range(0..3))]),
    }
}

/// Generate a random map nested up to `depth` levels
pub fn random_map(rng: &mut StdRng, depth: usize) -> MapValue {
    let mut map = MapValue::new();
    for key in KEYS {
        if !rng.gen_bool(0.5) {
            continue;
        }
        let value = if depth > 0 && rng.gen_bool(0.4) {
            Value::Map(random_map(rng, depth - 1))
        } else {
            random_leaf(rng)
        };
        map.insert(*key, value);
    }
    map
}

pub fn random_document(rng: &mut StdRng) -> ObjectValue {
    ObjectValue::from_map(random_map(rng, 3))
}

fn random_path(rng: &mut StdRng) -> FieldPath {
    let len = rng.gen_range(1..=3);
    FieldPath::from_segments((0..len).map(|_| KEYS[rng.gen_range(0..KEYS.len())]))
}

/// Generate a mask drawn from the fields of both documents, their ancestors,
/// and a few paths neither document has
pub fn random_mask(rng: &mut StdRng, target: &ObjectValue, source: &ObjectValue) -> FieldMask {
    let mut candidates: Vec<FieldPath> = Vec::new();
    for field in target.to_field_mask().into_iter().chain(source.to_field_mask()) {
        let mut current = field;
        while !current.is_empty() {
            let parent = current.pop_last();
            candidates.push(current);
            current = parent;
        }
    }
    for _ in 0..3 {
        candidates.push(random_path(rng));
    }

    candidates
        .into_iter()
        .filter(|_| rng.gen_bool(0.5))
        .collect()
}
