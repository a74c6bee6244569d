//! Error types for entirec core.

use thiserror::Error;

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors raised by entity operations.
///
/// Both kinds are caller contract violations and are returned as-is; no
/// operation retries or recovers from them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// The field holds a value that is not a number.
    #[error("Field '{field}' cannot be incremented.")]
    FieldNotIncrementable {
        /// Name of the field.
        field: String,
    },

    /// No model is bound, or the bound model has no such method.
    #[error("No model bound or unhandled method call '{method}'.")]
    UnboundMethod {
        /// Name of the method that could not be resolved.
        method: String,
    },
}

impl EntityError {
    /// Creates a field not incrementable error.
    pub fn field_not_incrementable(field: impl Into<String>) -> Self {
        Self::FieldNotIncrementable {
            field: field.into(),
        }
    }

    /// Creates an unbound method error.
    pub fn unbound_method(method: impl Into<String>) -> Self {
        Self::UnboundMethod {
            method: method.into(),
        }
    }
}
