//! Error types for document model operations.
//!
//! Missing fields are not errors: lookups return `None` and deletes of absent
//! fields are no-ops. Passing an empty path to a mutation is a caller bug and
//! panics. The errors here cover the recoverable edges of the model: typed
//! extraction from a [`Value`](super::Value), scalars outside their valid
//! range, and building documents from input that is not a map or that names
//! a field with an empty key.

use thiserror::Error;

use super::PathError;

/// Structured error types for document model operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ModelError {
    /// A value did not have the expected type
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A document root must be a map
    #[error("Document root must be a map, found {actual}")]
    NotAMap { actual: String },

    /// A scalar was outside the range its type allows
    #[error("{field} out of range: {value}")]
    OutOfRange { field: String, value: String },

    /// A path string could not be parsed, or input named an unaddressable field
    #[error(transparent)]
    InvalidPath(#[from] PathError),
}

impl ModelError {
    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            ModelError::TypeMismatch { .. } | ModelError::NotAMap { .. }
        )
    }

    /// Check if this error is a scalar range violation
    pub fn is_range_error(&self) -> bool {
        matches!(self, ModelError::OutOfRange { .. })
    }

    /// Check if this error is related to path parsing
    pub fn is_path_error(&self) -> bool {
        matches!(self, ModelError::InvalidPath(_))
    }
}

// Conversion from ModelError to the main Error type
impl From<ModelError> for crate::Error {
    fn from(err: ModelError) -> Self {
        crate::Error::Model(err)
    }
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}
