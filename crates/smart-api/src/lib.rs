//! smart-api - REST API layer for the smart marketplace
//!
//! This crate maps each HTTP route to a single call on the
//! [`DocumentStore`](smart_core::DocumentStore) trait. It is store-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use smart_api::{create_router, AppState};
//! use smart_mongo::MongoStore;
//!
//! let store = MongoStore::connect(&config).await?;
//! let state = AppState::new(Arc::new(store));
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::ApiError;
pub use middleware::AuthPolicy;
pub use state::AppState;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the smart REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Gates apply to GET /bids only; layers run outermost-last, so logging
    // goes on after the token check.
    let bids = get(handlers::bids::list_bids)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::verify_token,
        ))
        .layer(axum::middleware::from_fn(middleware::log_route_hit))
        .post(handlers::bids::create_bid);

    Router::new()
        // Liveness
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        // User routes
        .route("/users", post(handlers::users::create_user))
        // Product routes
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/latest-products",
            get(handlers::products::latest_products),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .patch(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        // Bid routes
        .route("/bids", bids)
        .route("/bids/{id}", delete(handlers::bids::delete_bid))
        .route(
            "/products/bids/{product_id}",
            get(handlers::bids::list_product_bids),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
