//! Form engine error types.

use thiserror::Error;

/// Errors raised while building form markup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Missing field name for FormBuilder::{method}")]
    MissingFieldName { method: String },

    #[error("Unknown input type: {0}")]
    UnknownInputType(String),

    #[error("Failed to serialize secured fields: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for FormError {
    fn from(err: bincode::Error) -> Self {
        FormError::Serialization(err.to_string())
    }
}

/// Result type for form operations
pub type FormResult<T> = Result<T, FormError>;
