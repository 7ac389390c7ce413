//! smart-core - Core traits and types for the smart marketplace server
//!
//! This crate provides the document-store abstraction that the HTTP layer is
//! written against. Backends (MongoDB, in-memory) implement [`DocumentStore`]
//! and are injected into the router as `Arc<dyn DocumentStore>`.

pub mod error;
pub mod memory;
pub mod models;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::*;
pub use store::DocumentStore;
