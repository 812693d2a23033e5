//! The document value model.
//!
//! This module holds the value tree and the operations that read and mutate it.
//!
//! # Core Types
//!
//! - [`Value`] - A recursive tagged value; only [`Value::Map`] is walked by the model
//! - [`MapValue`] - An ordered collection of uniquely keyed entries
//! - [`FieldPath`] - A sequence of segments addressing a value inside a document
//! - [`FieldMask`] - A sorted set of field paths
//! - [`ObjectValue`] - The mutable document container rooted at a map

pub mod errors;
pub mod json;
pub mod mask;
pub mod object;
pub mod path;
pub mod value;

pub use errors::ModelError;
pub use mask::FieldMask;
pub use object::ObjectValue;
pub use path::{FieldPath, PathError};
pub use value::{GeoPoint, MapValue, Timestamp, Value};
