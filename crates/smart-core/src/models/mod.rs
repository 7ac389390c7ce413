//! Shared data models for document stores

mod ack;
mod document;
mod query;

pub use ack::*;
pub use document::*;
pub use query::*;
