//! The mutable document container.
//!
//! [`ObjectValue`] owns the value tree of one document. Its root is always a
//! map. Reads walk the tree by [`FieldPath`]; writes resolve (and create) the
//! chain of parent maps for a path and then hand the field-level change to the
//! parent map's batched rewrite, so a merge touching many siblings rewrites
//! their map once instead of once per field.
//!
//! # Usage
//!
//! ```
//! use docmodel::field_path;
//! use docmodel::model::{MapValue, ObjectValue, Value};
//!
//! let mut doc = ObjectValue::new();
//! doc.set(&field_path!("a", "b"), "1".into());
//! doc.set(&field_path!("a", "c"), 2.into());
//!
//! let expected = MapValue::new().with("b", "1").with("c", 2);
//! assert_eq!(doc.get(&field_path!("a")), Some(&Value::Map(expected)));
//! assert_eq!(doc.to_field_mask().to_string(), "{a.b, a.c}");
//!
//! doc.delete(&field_path!("a", "b"));
//! assert_eq!(doc.get(&field_path!("a", "b")), None);
//! ```
//!
//! # Merging
//!
//! ```
//! use docmodel::field_path;
//! use docmodel::model::{FieldMask, ObjectValue};
//!
//! let mut target = ObjectValue::new();
//! target.set(&field_path!("name"), "Alice".into());
//! target.set(&field_path!("age"), 30.into());
//!
//! let mut patch = ObjectValue::new();
//! patch.set(&field_path!("name"), "Bob".into());
//!
//! // `age` is in the mask but not in the patch, so it is deleted
//! let mask: FieldMask = [field_path!("name"), field_path!("age")].into_iter().collect();
//! target.set_all(&mask, &patch);
//!
//! assert_eq!(target, patch);
//! ```

use std::{
    collections::{HashMap, HashSet},
    fmt, mem,
};

use super::{FieldMask, FieldPath, MapValue, ModelError, Value};

/// A document's fields as a mutable tree rooted at a map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ObjectValue {
    /// Always [`Value::Map`].
    value: Value,
}

impl ObjectValue {
    /// Creates an empty document
    pub fn new() -> Self {
        Self {
            value: Value::empty_map(),
        }
    }

    /// Creates a document from its root map
    pub fn from_map(map: MapValue) -> Self {
        Self {
            value: Value::Map(map),
        }
    }

    /// Returns the root map
    pub fn as_map(&self) -> &MapValue {
        match &self.value {
            Value::Map(map) => map,
            _ => unreachable!("document root is always a map"),
        }
    }

    fn root_map_mut(&mut self) -> &mut MapValue {
        match &mut self.value {
            Value::Map(map) => map,
            _ => unreachable!("document root is always a map"),
        }
    }

    /// Consumes the document and returns its root value (always a map).
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the value at `path`, or `None` if the path does not resolve.
    ///
    /// The empty path returns the root map. A path resolves only if every
    /// segment but the last names a map; running into a leaf or a missing key
    /// yields `None`. A stored [`Value::Null`] is returned as `Some`.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut current = &self.value;
        for segment in path.segments() {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }

    /// Like [`ObjectValue::get`], returning an owned copy.
    pub fn get_cloned(&self, path: &FieldPath) -> Option<Value> {
        self.get(path).cloned()
    }

    /// Sets `value` at `path`, creating intermediate maps as needed.
    ///
    /// Any non-map value found along the way is replaced by an empty map.
    ///
    /// # Panics
    /// Panics if `path` is empty.
    pub fn set(&mut self, path: &FieldPath, value: Value) {
        assert!(
            !path.is_empty(),
            "Cannot set field for empty path on ObjectValue"
        );

        let parent_map = self.parent_map(&path.pop_last());
        parent_map.apply_changes(
            HashMap::from([(path.last_segment().to_string(), value)]),
            HashSet::new(),
        );
    }

    /// Copies the fields named by `mask` from `data` into this document.
    ///
    /// For every path in the mask, the value at that path in `data` is set
    /// here; a path missing from `data` is deleted here. The result is the
    /// same as calling [`ObjectValue::set`] or [`ObjectValue::delete`] for
    /// each path in mask order, but fields sharing a parent are staged
    /// together and their parent map is rewritten once per run.
    ///
    /// # Panics
    /// Panics if `mask` contains the empty path.
    pub fn set_all(&mut self, mask: &FieldMask, data: &ObjectValue) {
        let mut parent = FieldPath::empty();
        let mut inserts: HashMap<String, Value> = HashMap::new();
        let mut deletes: HashSet<String> = HashSet::new();

        for path in mask {
            assert!(
                !path.is_empty(),
                "Cannot set field for empty path on ObjectValue"
            );

            if !parent.is_immediate_parent_of(path) {
                self.apply_batch(&parent, mem::take(&mut inserts), mem::take(&mut deletes));
                parent = path.pop_last();
            }

            let segment = path.last_segment().to_string();
            match data.get(path) {
                Some(value) => {
                    inserts.insert(segment, value.clone());
                }
                None => {
                    deletes.insert(segment);
                }
            }
        }

        self.apply_batch(&parent, inserts, deletes);
    }

    /// Removes the field at `path`.
    ///
    /// Deleting a field whose parent does not exist, or whose parent is not
    /// a map, does nothing.
    ///
    /// # Panics
    /// Panics if `path` is empty.
    pub fn delete(&mut self, path: &FieldPath) {
        assert!(
            !path.is_empty(),
            "Cannot delete field for empty path on ObjectValue"
        );

        if let Some(parent_map) = self.existing_map_mut(&path.pop_last()) {
            parent_map.apply_changes(
                HashMap::new(),
                HashSet::from([path.last_segment().to_string()]),
            );
        }
    }

    /// Returns a mask with one path per leaf field and per empty map.
    ///
    /// Empty maps are listed so that a merge driven by this mask reproduces
    /// them rather than dropping them.
    pub fn to_field_mask(&self) -> FieldMask {
        let mut fields = FieldMask::new();
        extract_field_mask(self.as_map(), &FieldPath::empty(), &mut fields);
        fields
    }

    /// Applies one staged run of sibling changes under `parent`.
    fn apply_batch(
        &mut self,
        parent: &FieldPath,
        inserts: HashMap<String, Value>,
        deletes: HashSet<String>,
    ) {
        if inserts.is_empty() && deletes.is_empty() {
            return;
        }

        tracing::debug!(
            parent = %parent,
            inserts = inserts.len(),
            deletes = deletes.len(),
            "Applying field batch"
        );

        if inserts.is_empty() {
            // Deleting alone never creates or coerces parents.
            if let Some(parent_map) = self.existing_map_mut(parent) {
                parent_map.apply_changes(inserts, deletes);
            }
        } else {
            self.parent_map(parent).apply_changes(inserts, deletes);
        }
    }

    /// Returns the map at `path`, creating it and any missing ancestors.
    ///
    /// A non-map value in the way is dropped and replaced by an empty map.
    fn parent_map(&mut self, path: &FieldPath) -> &mut MapValue {
        let mut current = self.root_map_mut();

        for segment in path.segments() {
            let index = match current.position(segment) {
                Some(index) => {
                    let entry = current.value_at_mut(index);
                    if !entry.is_map() {
                        tracing::trace!(
                            segment,
                            replaced = entry.type_name(),
                            "Replacing non-map value with a map"
                        );
                        *entry = Value::empty_map();
                    }
                    index
                }
                None => {
                    current.apply_changes(
                        HashMap::from([(segment.to_string(), Value::empty_map())]),
                        HashSet::new(),
                    );
                    current.len() - 1
                }
            };

            current = match current.value_at_mut(index) {
                Value::Map(map) => map,
                _ => unreachable!("parent entry was just made a map"),
            };
        }

        current
    }

    /// Returns the map at `path` without creating or replacing anything.
    fn existing_map_mut(&mut self, path: &FieldPath) -> Option<&mut MapValue> {
        let mut current = &mut self.value;
        for segment in path.segments() {
            current = current.as_map_mut()?.get_mut(segment)?;
        }
        current.as_map_mut()
    }
}

fn extract_field_mask(map: &MapValue, prefix: &FieldPath, fields: &mut FieldMask) {
    for (key, value) in map.iter() {
        let current_path = prefix.append_segment(key);
        match value {
            Value::Map(nested) if !nested.is_empty() => {
                extract_field_mask(nested, &current_path, fields);
            }
            _ => {
                fields.insert(current_path);
            }
        }
    }
}

impl Default for ObjectValue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<MapValue> for ObjectValue {
    fn from(map: MapValue) -> Self {
        Self::from_map(map)
    }
}

impl TryFrom<Value> for ObjectValue {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Map(map) => Ok(Self::from_map(map)),
            other => Err(ModelError::NotAMap {
                actual: other.type_name().to_string(),
            }),
        }
    }
}

impl From<ObjectValue> for Value {
    fn from(object: ObjectValue) -> Self {
        object.into_value()
    }
}
