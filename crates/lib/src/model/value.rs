//! Value types for documents.
//!
//! This module provides the [`Value`] enum that represents every value that can
//! be stored in a document, and [`MapValue`], the ordered map that forms the
//! branches of a document tree. Every other variant is an opaque leaf that is
//! copied and compared by value.
//!
//! [`MapValue`] keeps its entries in a `Vec` in insertion order. All structural
//! changes go through a single batched rewrite, `apply_changes`, which applies
//! any number of upserts and deletions in one linear pass over the entries.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use super::ModelError;

/// A point in time with nanosecond precision, counted from the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "RawTimestamp")]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

/// Unchecked serde shape of [`Timestamp`].
#[derive(serde::Deserialize)]
struct RawTimestamp {
    seconds: i64,
    nanos: i32,
}

impl TryFrom<RawTimestamp> for Timestamp {
    type Error = ModelError;

    fn try_from(raw: RawTimestamp) -> Result<Self, Self::Error> {
        Self::try_new(raw.seconds, raw.nanos)
    }
}

impl Timestamp {
    /// Creates a timestamp.
    ///
    /// # Panics
    /// Panics if `nanos` is outside `0..1_000_000_000`.
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self::try_new(seconds, nanos).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates a timestamp, failing with [`ModelError::OutOfRange`] if
    /// `nanos` is outside `0..1_000_000_000`.
    pub fn try_new(seconds: i64, nanos: i32) -> Result<Self, ModelError> {
        if !(0..1_000_000_000).contains(&nanos) {
            return Err(ModelError::OutOfRange {
                field: "Timestamp nanoseconds".to_string(),
                value: nanos.to_string(),
            });
        }
        Ok(Self { seconds, nanos })
    }

    /// Seconds since the Unix epoch.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Sub-second nanoseconds, always non-negative.
    pub fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Converts to a chrono UTC datetime, or `None` if out of chrono's range.
    pub fn to_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.seconds, self.nanos as u32)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Timestamp {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        Self::new(value.timestamp(), value.timestamp_subsec_nanos() as i32)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(
                f,
                "{}",
                datetime.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
            ),
            None => write!(f, "{}.{:09}s", self.seconds, self.nanos),
        }
    }
}

/// A geographic location.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

/// Unchecked serde shape of [`GeoPoint`].
#[derive(serde::Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = ModelError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::try_new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Creates a point.
    ///
    /// # Panics
    /// Panics if latitude is outside `[-90, 90]` or longitude is outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self::try_new(latitude, longitude).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates a point, failing with [`ModelError::OutOfRange`] if latitude
    /// is outside `[-90, 90]` or longitude is outside `[-180, 180]`. NaN is
    /// outside both.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, ModelError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ModelError::OutOfRange {
                field: "Latitude".to_string(),
                value: latitude.to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ModelError::OutOfRange {
                field: "Longitude".to_string(),
                value: longitude.to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Degrees north of the equator, in `[-90, 90]`.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Degrees east of the prime meridian, in `[-180, 180]`.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Values that can be stored in documents.
///
/// Only [`Value::Map`] has structure that the document model walks into.
/// Every other variant, including [`Value::Array`], is a leaf.
///
/// # Direct Comparisons
///
/// `Value` implements `PartialEq` with primitive types for ergonomic comparisons:
///
/// ```
/// # use docmodel::model::Value;
/// let text = Value::String("hello".to_string());
/// let number = Value::Integer(42);
///
/// assert!(text == "hello");
/// assert!(number == 42);
/// assert!(42 == number);
/// assert!(!(text == 42));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Double(f64),
    /// Point in time
    Timestamp(Timestamp),
    /// UTF-8 text
    String(String),
    /// Raw bytes
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Resource name of another document
    Reference(String),
    /// Geographic location
    GeoPoint(GeoPoint),
    /// Ordered sequence of values, treated as a leaf
    Array(Vec<Value>),
    /// Nested map of fields
    Map(MapValue),
}

impl Value {
    /// Returns an empty map value.
    pub fn empty_map() -> Self {
        Value::Map(MapValue::new())
    }

    /// Returns true if this is a map value
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::Timestamp(_) => "timestamp",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Reference(_) => "reference",
            Value::GeoPoint(_) => "geo_point",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Value::Reference(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_geo_point(&self) -> Option<GeoPoint> {
        match self {
            Value::GeoPoint(point) => Some(*point),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Attempts to convert to a map (returns immutable reference)
    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to convert to a mutable map reference
    pub fn as_map_mut(&mut self) -> Option<&mut MapValue> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n:?}"),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(bytes) => write!(f, "b64:{}", super::json::encode_bytes(bytes)),
            Value::Reference(name) => write!(f, "ref:{name}"),
            Value::GeoPoint(point) => write!(f, "geo({}, {})", point.latitude, point.longitude),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, item) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => write!(f, "{map}"),
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl From<GeoPoint> for Value {
    fn from(value: GeoPoint) -> Self {
        Value::GeoPoint(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<MapValue> for Value {
    fn from(value: MapValue) -> Self {
        Value::Map(value)
    }
}

fn type_mismatch(expected: &str, value: &Value) -> ModelError {
    ModelError::TypeMismatch {
        expected: expected.to_string(),
        actual: value.type_name().to_string(),
    }
}

impl TryFrom<&Value> for i64 {
    type Error = ModelError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_integer().ok_or_else(|| type_mismatch("integer", value))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = ModelError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_double().ok_or_else(|| type_mismatch("double", value))
    }
}

impl TryFrom<&Value> for bool {
    type Error = ModelError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| type_mismatch("boolean", value))
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = ModelError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_string().ok_or_else(|| type_mismatch("string", value))
    }
}

impl TryFrom<&Value> for String {
    type Error = ModelError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        <&str>::try_from(value).map(str::to_string)
    }
}

impl TryFrom<&Value> for MapValue {
    type Error = ModelError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_map()
            .cloned()
            .ok_or_else(|| type_mismatch("map", value))
    }
}

// PartialEq implementations for comparing Value with other types
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_string() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_integer() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_integer() == Some(*other as i64)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

// Reverse implementations for symmetry
impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i32 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

const EMPTY_KEY_MESSAGE: &str = "Map keys must not be empty";

#[derive(Debug, Clone, PartialEq)]
struct MapEntry {
    key: String,
    value: Value,
}

/// An ordered map from string keys to values.
///
/// Keys are unique and non-empty, so every entry is addressable by a
/// [`FieldPath`](super::FieldPath). Entries keep the position they were first
/// inserted at; replacing a value does not move its entry. Equality ignores
/// entry order.
#[derive(Debug, Clone, Default)]
pub struct MapValue {
    fields: Vec<MapEntry>,
}

impl MapValue {
    /// Creates an empty map
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the index of the entry for `key`.
    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|entry| entry.key == key)
    }

    /// Returns the value at `index`.
    pub(crate) fn value_at_mut(&mut self, index: usize) -> &mut Value {
        &mut self.fields[index].value
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Returns an iterator over entries in storage order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Returns an iterator over keys in storage order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|entry| entry.key.as_str())
    }

    /// Inserts or replaces a single entry.
    ///
    /// # Panics
    /// Panics if `key` is empty.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.apply_changes(HashMap::from([(key.into(), value.into())]), HashSet::new());
    }

    /// Removes a single entry if present.
    pub fn remove(&mut self, key: &str) {
        self.apply_changes(HashMap::new(), HashSet::from([key.to_string()]));
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Rewrites the entries in one pass, applying `inserts` as upserts and
    /// removing every key in `deletes`.
    ///
    /// Existing entries that are kept or replaced stay in their relative order;
    /// a replaced value takes its old entry's place. Keys in `inserts` that did
    /// not exist are appended after all of them, in no particular order. A key
    /// present in both `inserts` and `deletes` is inserted.
    ///
    /// Storage is grown before the pass and only shrunk after every surviving
    /// entry is in place. The work is linear in `self.len() + inserts.len()`.
    ///
    /// # Panics
    /// Panics if `inserts` contains the empty key.
    pub(crate) fn apply_changes(
        &mut self,
        mut inserts: HashMap<String, Value>,
        deletes: HashSet<String>,
    ) {
        assert!(!inserts.contains_key(""), "{EMPTY_KEY_MESSAGE}");

        let original_len = self.fields.len();
        let target_size = inserts.len()
            + self
                .fields
                .iter()
                .filter(|entry| {
                    !inserts.contains_key(&entry.key) && !deletes.contains(&entry.key)
                })
                .count();

        if target_size > original_len {
            self.fields.reserve(target_size - original_len);
        }

        self.fields.retain_mut(|entry| {
            if let Some(value) = inserts.remove(&entry.key) {
                entry.value = value;
                true
            } else {
                !deletes.contains(&entry.key)
            }
        });

        self.fields.extend(
            inserts
                .into_iter()
                .map(|(key, value)| MapEntry { key, value }),
        );

        if target_size < original_len {
            self.fields.shrink_to(target_size);
        }

        debug_assert_eq!(self.fields.len(), target_size);
        tracing::trace!(
            before = original_len,
            after = target_size,
            deletes = deletes.len(),
            "Applied map changes"
        );
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Display for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// Later duplicates replace the value of the first occurrence in place.
/// Panics on an empty key.
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapValue {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fields: Vec<MapEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (key, value) in iter {
            let key = key.into();
            assert!(!key.is_empty(), "{EMPTY_KEY_MESSAGE}");
            let value = value.into();
            match index.get(&key) {
                Some(&position) => fields[position].value = value,
                None => {
                    index.insert(key.clone(), fields.len());
                    fields.push(MapEntry { key, value });
                }
            }
        }
        Self { fields }
    }
}

impl Serialize for MapValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct MapValueVisitor;

impl<'de> Visitor<'de> for MapValueVisitor {
    type Value = MapValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of string keys to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, Value)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            if key.is_empty() {
                return Err(serde::de::Error::custom(EMPTY_KEY_MESSAGE));
            }
            entries.push((key, value));
        }
        Ok(entries.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for MapValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapValueVisitor)
    }
}
