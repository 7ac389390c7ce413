//! User handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smart_core::{Collection, Filter, InsertAck, StoreError};

use super::{into_document, JsonBody};
use crate::error::ApiError;
use crate::state::AppState;

pub const USER_EXISTS_MESSAGE: &str = "User already exists. No need to insert again.";

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Either the insert acknowledgment or the "already exists" message
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Inserted(InsertAck),
    Exists(MessageResponse),
}

impl CreateUserResponse {
    fn exists() -> Self {
        Self::Exists(MessageResponse {
            message: USER_EXISTS_MESSAGE.to_string(),
        })
    }
}

/// POST /users
/// Register a user once per email
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let user = into_document(body)?;
    let email = user
        .get("email")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest("email is required".to_string()))?
        .to_string();

    let store = state.store();
    if store
        .find_one(Collection::Users, &Filter::eq("email", email.as_str()))
        .await?
        .is_some()
    {
        tracing::debug!(%email, "user already registered");
        return Ok(Json(CreateUserResponse::exists()));
    }

    // The lookup above is not atomic with the insert; a unique index on
    // users.email turns a lost race into a duplicate-key error.
    match store.insert_one(Collection::Users, user).await {
        Ok(ack) => {
            tracing::info!(%email, "user registered");
            Ok(Json(CreateUserResponse::Inserted(ack)))
        }
        Err(StoreError::Duplicate(_)) => Ok(Json(CreateUserResponse::exists())),
        Err(e) => Err(e.into()),
    }
}
