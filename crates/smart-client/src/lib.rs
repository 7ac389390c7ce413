//! Smart marketplace client library
//!
//! Provides a typed HTTP client for the users, products and bids routes.
//!
//! # Example
//!
//! ```rust,no_run
//! use smart_client::SmartClient;
//! use serde_json::json;
//!
//! # async fn example() -> smart_client::Result<()> {
//! let client = SmartClient::new("http://localhost:3000")?;
//!
//! let ack = client
//!     .create_product(&json!({"name": "Widget", "price": 5}))
//!     .await?;
//! let product = client.get_product(ack.inserted_id.as_str().unwrap()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! The `testing` module starts a router on an ephemeral port:
//!
//! ```rust,ignore
//! use smart_client::testing::TestServer;
//! use smart_api::{create_router, AppState};
//!
//! let server = TestServer::start(create_router(state)).await?;
//! let products = server.client.list_products(None).await?;
//! ```

mod client;
mod error;
pub mod testing;
mod types;

pub use client::SmartClient;
pub use error::{Result, SmartClientError};
pub use types::*;

// Re-export core types for convenience
pub use smart_core::{DeleteAck, Document, InsertAck, UpdateAck};
