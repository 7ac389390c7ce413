//! DocumentStore trait - the core abstraction for store backends

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{Collection, DeleteAck, Document, Filter, FindOptions, InsertAck, UpdateAck};

/// The trait that all document-store backends implement.
///
/// The HTTP layer only ever talks to this trait, so the same routes can be
/// served by:
/// - `MongoStore` - MongoDB via the official driver
/// - `MemoryStore` - in-process collections for demos and tests
///
/// Every operation is a single-document or single-query call; nothing here
/// spans multiple operations atomically.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs ("mongodb", "memory")
    fn backend_name(&self) -> &'static str;

    /// Check that the store is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Find all documents matching `filter`, sorted and limited per `options`
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Find the first document matching `filter`
    async fn find_one(&self, collection: Collection, filter: &Filter)
        -> StoreResult<Option<Document>>;

    /// Insert a document verbatim, generating `_id` when absent
    async fn insert_one(&self, collection: Collection, document: Document)
        -> StoreResult<InsertAck>;

    /// Set the given fields on the first document matching `filter`
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateAck>;

    /// Delete the first document matching `filter`
    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<DeleteAck>;

    /// Release connections. Called once, after the server stops accepting.
    async fn shutdown(&self) {}
}
