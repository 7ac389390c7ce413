//! Liveness and health handlers

use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
pub async fn root() -> &'static str {
    "Smart server is running"
}

/// GET /health
/// Round-trips to the document store
pub async fn health(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.store().ping().await?;
    Ok("OK")
}
