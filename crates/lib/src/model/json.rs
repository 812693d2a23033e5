//! Human-readable JSON rendering of values.
//!
//! This is a display and import convenience, not a storage format. Plain JSON
//! maps onto [`Value`] as follows: `null`, booleans, strings, arrays and objects
//! map to their namesakes; integral numbers that fit in an `i64` become
//! [`Value::Integer`] and every other number becomes [`Value::Double`].
//!
//! Rendering is lossy for the variants JSON has no type for:
//!
//! - [`Value::Timestamp`] renders as an RFC 3339 string
//! - [`Value::Bytes`] renders as a base64 string
//! - [`Value::Reference`] renders as its resource name
//! - [`Value::GeoPoint`] renders as `{"latitude": .., "longitude": ..}`
//! - non-finite doubles render as `null`
//!
//! For a lossless encoding use the serde implementations instead.

use base64ct::{Base64, Encoding};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::{FieldPath, MapValue, ModelError, ObjectValue, PathError, Value};

/// Encodes bytes as standard padded base64.
pub(crate) fn encode_bytes(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

impl Value {
    /// Converts a plain JSON value into a [`Value`].
    ///
    /// Fails with [`PathError::EmptyFieldName`] if any object, at any depth,
    /// has an empty key.
    pub fn from_json(json: JsonValue) -> Result<Self, ModelError> {
        Self::from_json_at(json, &FieldPath::empty())
    }

    /// Converts `json`, found at `path`, for error reporting.
    fn from_json_at(json: JsonValue, path: &FieldPath) -> Result<Self, ModelError> {
        let value = match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| Self::from_json_at(item, path))
                    .collect::<Result<Vec<_>, ModelError>>()?,
            ),
            JsonValue::Object(object) => {
                let mut entries = Vec::with_capacity(object.len());
                for (key, value) in object {
                    if key.is_empty() {
                        return Err(PathError::EmptyFieldName {
                            parent: path.to_string(),
                        }
                        .into());
                    }
                    let child = Self::from_json_at(value, &path.append_segment(key.as_str()))?;
                    entries.push((key, child));
                }
                Value::Map(entries.into_iter().collect())
            }
        };
        Ok(value)
    }

    /// Renders this value as plain JSON.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Integer(n) => JsonValue::Number((*n).into()),
            Value::Double(n) => Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Timestamp(ts) => JsonValue::String(ts.to_string()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Bytes(bytes) => JsonValue::String(encode_bytes(bytes)),
            Value::Reference(name) => JsonValue::String(name.clone()),
            Value::GeoPoint(point) => serde_json::json!({
                "latitude": point.latitude(),
                "longitude": point.longitude(),
            }),
            Value::Array(values) => JsonValue::Array(values.iter().map(Value::to_json).collect()),
            Value::Map(map) => map.to_json(),
        }
    }
}

impl MapValue {
    /// Renders this map as a JSON object.
    pub fn to_json(&self) -> JsonValue {
        let object: JsonMap<String, JsonValue> = self
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect();
        JsonValue::Object(object)
    }
}

impl ObjectValue {
    /// Builds a document from a JSON object.
    ///
    /// Fails with [`ModelError::NotAMap`] if `json` is not an object, and
    /// with [`ModelError::InvalidPath`] if any object in it has an empty key.
    pub fn from_json(json: JsonValue) -> Result<Self, ModelError> {
        ObjectValue::try_from(Value::from_json(json)?)
    }

    /// Parses a document from JSON text.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let parsed: JsonValue = serde_json::from_str(json)?;
        Ok(Self::from_json(parsed)?)
    }

    /// Renders the document as a JSON object.
    pub fn to_json(&self) -> JsonValue {
        self.as_map().to_json()
    }
}
