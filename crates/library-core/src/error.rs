//! Core error types.

use thiserror::Error;

/// Catalog and model errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] library_proto::Error),

    /// Date arithmetic left the representable calendar range.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Entity is not part of the schema.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Field is not declared on the entity.
    #[error("unknown field: {entity}.{field}")]
    UnknownField {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// Relational field points at an undeclared relation.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// Value of the wrong type written to a field.
    #[error("type mismatch on {field}: expected {expected}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Expected value kind.
        expected: &'static str,
    },

    /// Field is read-only in the record's current state.
    #[error("field {entity}.{field} is read-only in state {state}")]
    ReadOnlyField {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
        /// Lifecycle state that locks the field.
        state: String,
    },

    /// Field restricted to groups the caller does not hold.
    #[error("field access denied: {entity}.{field} requires one of {required:?}")]
    FieldAccessDenied {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
        /// Groups granting access.
        required: Vec<String>,
    },

    /// Filter on a computed field that cannot be rewritten.
    #[error("cannot search on {field}: {reason}")]
    UnsupportedSearch {
        /// Field name.
        field: String,
        /// Why the condition was rejected.
        reason: String,
    },

    /// Module manifest is malformed.
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// I/O error while reading module files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
