//! Field masks.
//!
//! A [`FieldMask`] is a set of [`FieldPath`]s. It is produced by
//! [`ObjectValue::to_field_mask`](super::ObjectValue::to_field_mask) to describe
//! which fields a document holds, and consumed by
//! [`ObjectValue::set_all`](super::ObjectValue::set_all) to name the fields a
//! merge writes or deletes.
//!
//! Paths are kept sorted by segment, so iteration visits paths that share an
//! immediate parent one after another. The merge relies on that to rewrite
//! each touched map once.

use std::{collections::BTreeSet, fmt};

use super::FieldPath;

/// A sorted set of field paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FieldMask {
    fields: BTreeSet<FieldPath>,
}

impl FieldMask {
    /// Creates an empty mask
    pub fn new() -> Self {
        Self {
            fields: BTreeSet::new(),
        }
    }

    /// Adds a path, returning `false` if it was already present.
    pub fn insert(&mut self, path: FieldPath) -> bool {
        self.fields.insert(path)
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.fields.contains(path)
    }

    /// Returns `true` if some path in the mask is a prefix of `path`.
    ///
    /// A mask entry for `a` covers `a`, `a.b` and everything below it.
    pub fn covers(&self, path: &FieldPath) -> bool {
        self.fields.iter().any(|field| field.is_prefix_of(path))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.iter()
    }
}

impl FromIterator<FieldPath> for FieldMask {
    fn from_iter<T: IntoIterator<Item = FieldPath>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FieldMask {
    type Item = FieldPath;
    type IntoIter = std::collections::btree_set::IntoIter<FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldMask {
    type Item = &'a FieldPath;
    type IntoIter = std::collections::btree_set::Iter<'a, FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, path) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{path}")?;
        }
        write!(f, "}}")
    }
}
