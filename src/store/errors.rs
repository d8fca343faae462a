//! Record store errors

use thiserror::Error;

/// Errors raised by record stores
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Record has no string identifier at the configured id field
    #[error("record has no string identifier at '{field}'")]
    MissingId { field: String },

    /// No record with this identifier
    #[error("no record with identifier '{id}'")]
    NotFound { id: String },

    /// Backing store could not serve the request
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
