//! Response types specific to the client

use serde::{Deserialize, Serialize};
use smart_core::InsertAck;

/// Error body returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Plain `{"message": ...}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Outcome of `POST /users`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CreateUserOutcome {
    /// User was inserted
    Inserted(InsertAck),
    /// A user with this email already existed; nothing was inserted
    AlreadyExists(MessageResponse),
}

impl CreateUserOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}
