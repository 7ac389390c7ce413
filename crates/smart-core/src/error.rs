//! Common error types for document stores

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in document stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier could not be parsed into the store's native format
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Write rejected by a uniqueness constraint
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// Store could not be reached (connect, server selection, I/O)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Document could not be converted to or from the store format
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
