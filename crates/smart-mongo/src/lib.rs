//! smart-mongo - MongoDB backend for the smart marketplace
//!
//! Implements [`DocumentStore`](smart_core::DocumentStore) on top of the
//! official `mongodb` driver. Documents cross the boundary as JSON objects;
//! ObjectIds are rendered as 24-character hex strings on the way out.

pub mod config;
pub mod convert;
mod error;
pub mod store;

pub use config::MongoConfig;
pub use store::MongoStore;
