//! API error types and conversions

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use smart_core::StoreError;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized
    Unauthorized(String),
    /// 409 Conflict
    Conflict(String),
    /// 415 Unsupported Media Type
    UnsupportedMediaType(String),
    /// 503 Service Unavailable
    ServiceUnavailable(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                msg,
            ),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(raw) => ApiError::BadRequest(format!("Invalid identifier: {}", raw)),
            StoreError::Duplicate(detail) => {
                tracing::debug!(%detail, "duplicate key");
                ApiError::Conflict("Document already exists".to_string())
            }
            // Store details stay in the log, never in the response body
            StoreError::Unavailable(detail) => {
                tracing::error!(%detail, "document store unavailable");
                ApiError::ServiceUnavailable("Document store unavailable".to_string())
            }
            StoreError::Serialization(detail) | StoreError::Internal(detail) => {
                tracing::error!(%detail, "document store failure");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(r) => {
                ApiError::UnsupportedMediaType(r.body_text())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        // missing route parameters are a router bug, not a bad request
        if rejection.status().is_server_error() {
            ApiError::Internal(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_maps_to_bad_request() {
        let err = ApiError::from(StoreError::InvalidId("nope".to_string()));
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid identifier: nope"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_details_are_not_leaked() {
        let err = ApiError::from(StoreError::Internal("secret connection string".to_string()));
        assert!(matches!(err, ApiError::Internal(ref m) if m == "Internal server error"));

        let err = ApiError::from(StoreError::Unavailable("10.0.0.3:27017 refused".to_string()));
        assert!(matches!(err, ApiError::ServiceUnavailable(ref m) if !m.contains("10.0.0.3")));
    }

    #[test]
    fn store_errors_map_to_one_status_each() {
        let cases = [
            (StoreError::InvalidId("x".to_string()), StatusCode::BAD_REQUEST),
            (StoreError::Duplicate("k".to_string()), StatusCode::CONFLICT),
            (StoreError::Unavailable("d".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Serialization("s".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (StoreError::Internal("i".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn unauthorized_status() {
        let response = ApiError::Unauthorized("unauthorized access".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
