//! HTTP request handlers for the smart API
//!
//! Each handler issues exactly one document-store call (the user route issues
//! a lookup followed by an insert) and returns the raw result as JSON.

pub mod bids;
pub mod products;
pub mod root;
pub mod users;

use axum::extract::{FromRequest, FromRequestParts};
use serde_json::Value;
use smart_core::Document;

use crate::error::ApiError;

/// `Json` extractor whose rejections use the API error format
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `Path` extractor whose rejections use the API error format
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// `Query` extractor whose rejections use the API error format
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Query string carrying an optional `email` filter
#[derive(Debug, Default, serde::Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Accept only JSON objects as documents
pub(crate) fn into_document(body: Value) -> Result<Document, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::BadRequest(
            "request body must be a JSON object".to_string(),
        )),
    }
}
