//!
//! docmodel: the in-memory document model of a database client.
//! This library provides a mutable, path-addressable value tree used to stage reads,
//! point writes and merges before they are sent to or reconciled with a backend.
//!
//! ## Core Concepts
//!
//! * **Values (`model::Value`)**: A recursive tagged value. Every variant except `Map` is an opaque leaf.
//! * **Field paths (`model::FieldPath`)**: An ordered list of keys locating a value inside a document.
//! * **Field masks (`model::FieldMask`)**: A sorted set of field paths naming fields that are present or explicitly specified.
//! * **Documents (`model::ObjectValue`)**: The container owning a root map, with get/set/delete and
//!   field-mask driven merges (`set_all`) applied through a batched, single-pass map rewrite.

pub mod model;

pub use model::{FieldMask, FieldPath, MapValue, ObjectValue, Value};

/// Result type used throughout the docmodel library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the docmodel library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured path parsing errors from the model module
    #[error(transparent)]
    Path(model::PathError),

    /// Structured document model errors from the model module
    #[error(transparent)]
    Model(model::ModelError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Path(_) | Error::Model(_) => "model",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is a path parsing failure.
    pub fn is_path_error(&self) -> bool {
        match self {
            Error::Path(_) => true,
            Error::Model(model_err) => model_err.is_path_error(),
            _ => false,
        }
    }

    /// Check if this error is a value type mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Model(model_err) => model_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error came from reading or writing JSON.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
