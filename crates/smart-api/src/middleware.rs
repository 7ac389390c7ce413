//! Request gates for the bids listing route
//!
//! `GET /bids` runs through two stages before its handler:
//! 1. [`log_route_hit`] records the request, no effect on control flow
//! 2. [`verify_token`] checks that an `Authorization` header is present
//!
//! The token itself is never verified. Under [`AuthPolicy::Permissive`] a
//! missing header is only logged; under [`AuthPolicy::Enforce`] the chain
//! short-circuits with 401 and the handler is never called.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// What the token gate does when `Authorization` is missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthPolicy {
    /// Log and let the request through
    #[default]
    Permissive,
    /// Reject with 401
    Enforce,
}

/// Logging stage
pub async fn log_route_hit(request: Request, next: Next) -> Response {
    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        has_authorization = request.headers().contains_key(AUTHORIZATION),
        "route hit"
    );
    next.run(request).await
}

/// Token-presence stage
pub async fn verify_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let has_token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty());

    if has_token {
        return Ok(next.run(request).await);
    }

    match state.auth_policy() {
        AuthPolicy::Permissive => {
            tracing::warn!(
                path = %request.uri().path(),
                "Missing Authorization header, allowed by permissive policy"
            );
            Ok(next.run(request).await)
        }
        AuthPolicy::Enforce => {
            tracing::warn!(
                path = %request.uri().path(),
                "Missing Authorization header, rejecting"
            );
            Err(ApiError::Unauthorized("unauthorized access".to_string()))
        }
    }
}
