//! Driver error classification

use mongodb::error::{Error, ErrorKind, WriteFailure};
use smart_core::StoreError;

/// Server error code for unique index violations
const DUPLICATE_KEY: i32 = 11000;

/// Map a driver error onto the store error taxonomy
pub(crate) fn store_error(err: Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            StoreError::Duplicate(write_error.message.clone())
        }
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. } => StoreError::Unavailable(err.to_string()),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            StoreError::Serialization(err.to_string())
        }
        ErrorKind::InvalidArgument { .. } => StoreError::Internal(format!("invalid argument: {}", err)),
        _ => StoreError::Internal(err.to_string()),
    }
}
