//! Product handlers

use axum::extract::State;
use axum::Json;
use serde_json::Value;
use smart_core::{
    Collection, DeleteAck, Document, DocumentId, Filter, FindOptions, InsertAck, UpdateAck,
};

use super::{into_document, EmailQuery, JsonBody, PathParam, QueryParams};
use crate::error::ApiError;
use crate::state::AppState;

/// Maximum number of products returned by `/latest-products`
pub const LATEST_PRODUCTS_LIMIT: u64 = 9;

/// Fields a PATCH is allowed to touch
const UPDATABLE_FIELDS: [&str; 2] = ["name", "price"];

/// GET /products?email=
/// List products, optionally only those listed by one seller
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = Filter::eq_if_present("email", query.email.as_deref());
    let products = state
        .store()
        .find(Collection::Products, &filter, &FindOptions::new())
        .await?;
    Ok(Json(products))
}

/// GET /latest-products
/// Most recently created products, newest first
pub async fn latest_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let options = FindOptions::new()
        .sort_desc("created_at")
        .limit(LATEST_PRODUCTS_LIMIT);
    let products = state
        .store()
        .find(Collection::Products, &Filter::All, &options)
        .await?;
    Ok(Json(products))
}

/// GET /products/{id}
/// A missing product is `null` with 200, not 404
pub async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let id = DocumentId::parse(&id)?;
    let product = state
        .store()
        .find_one(Collection::Products, &Filter::Id(id))
        .await?;
    Ok(Json(product))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let product = into_document(body)?;
    let ack = state
        .store()
        .insert_one(Collection::Products, product)
        .await?;
    tracing::info!(id = %ack.inserted_id, "product created");
    Ok(Json(ack))
}

/// PATCH /products/{id}
/// Sets `name` and `price`; a field absent from the body is written as null
pub async fn update_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<UpdateAck>, ApiError> {
    let id = DocumentId::parse(&id)?;
    let body = into_document(body)?;
    let set: Document = UPDATABLE_FIELDS
        .iter()
        .map(|field| {
            let value = body.get(*field).cloned().unwrap_or(Value::Null);
            (field.to_string(), value)
        })
        .collect();

    let ack = state
        .store()
        .update_one(Collection::Products, &Filter::Id(id), set)
        .await?;
    Ok(Json(ack))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    let id = DocumentId::parse(&id)?;
    let ack = state
        .store()
        .delete_one(Collection::Products, &Filter::Id(id))
        .await?;
    Ok(Json(ack))
}
