//! Protocol error types.

use thiserror::Error;

/// Errors raised while building or decoding values and filters.
#[derive(Debug, Error)]
pub enum Error {
    /// Operator spelling that names no comparison.
    #[error("invalid comparison operator: {0:?}")]
    InvalidOperator(String),

    /// Text that does not parse as an ISO-8601 calendar date.
    #[error("invalid date {input:?}: {source}")]
    InvalidDate {
        /// Offending input.
        input: String,
        /// Underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },

    /// A compound filter appeared where only a simple condition fits.
    #[error("compound filter cannot be nested inside And/Or")]
    NestedFilter,

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
