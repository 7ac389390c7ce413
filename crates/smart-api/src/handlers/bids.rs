//! Bid handlers

use axum::extract::State;
use axum::Json;
use serde_json::Value;
use smart_core::{Collection, DeleteAck, Document, DocumentId, Filter, FindOptions, InsertAck};

use super::{into_document, EmailQuery, JsonBody, PathParam, QueryParams};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /bids?email=
/// List bids, optionally only those placed by one buyer.
/// Runs behind the logging and token gates.
pub async fn list_bids(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = Filter::eq_if_present("buyer_email", query.email.as_deref());
    let bids = state
        .store()
        .find(Collection::Bids, &filter, &FindOptions::new())
        .await?;
    Ok(Json(bids))
}

/// GET /products/bids/{product_id}
/// Bids on one product, highest first.
///
/// `product_id` is compared as a plain string against each bid's `product`
/// field, so no identifier parsing happens here.
pub async fn list_product_bids(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let options = FindOptions::new().sort_desc("bid_price");
    let bids = state
        .store()
        .find(Collection::Bids, &Filter::eq("product", product_id), &options)
        .await?;
    Ok(Json(bids))
}

/// POST /bids
pub async fn create_bid(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let bid = into_document(body)?;
    let ack = state.store().insert_one(Collection::Bids, bid).await?;
    tracing::info!(id = %ack.inserted_id, "bid placed");
    Ok(Json(ack))
}

/// DELETE /bids/{id}
pub async fn delete_bid(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    let id = DocumentId::parse(&id)?;
    let ack = state
        .store()
        .delete_one(Collection::Bids, &Filter::Id(id))
        .await?;
    Ok(Json(ack))
}
