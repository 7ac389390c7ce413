//! In-memory document store for demos and testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    Collection, DeleteAck, Document, DocumentId, Filter, FindOptions, InsertAck, UpdateAck,
    ID_FIELD,
};
use crate::store::DocumentStore;

/// In-memory document store
///
/// Documents are kept in insertion order per collection. Each operation holds
/// the lock for its whole duration; sequences of operations are not atomic.
/// There are no unique indexes.
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(Collection::ALL.into_iter().map(|c| (c, Vec::new())).collect()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store going away (every operation fails with `Unavailable`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map_or(0, Vec::len)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let collections = self.collections.read();
        let mut docs: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();
        options.apply(&mut docs);
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        self.check_available()?;
        let collections = self.collections.read();
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> StoreResult<InsertAck> {
        self.check_available()?;
        let id = match document.get(ID_FIELD) {
            Some(existing) => existing.clone(),
            None => {
                let id = Value::String(DocumentId::generate().to_hex());
                document.insert(ID_FIELD.to_string(), id.clone());
                id
            }
        };

        let mut collections = self.collections.write();
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|d| d.get(ID_FIELD) == Some(&id)) {
            return Err(StoreError::Duplicate(format!("{}: _id {}", collection, id)));
        }
        docs.push(document);

        tracing::trace!(%collection, %id, "inserted document");
        Ok(InsertAck::new(id))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateAck> {
        self.check_available()?;
        let mut collections = self.collections.write();
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)))
        else {
            return Ok(UpdateAck::new(0, 0));
        };

        let mut modified = false;
        for (key, value) in set {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateAck::new(1, u64::from(modified)))
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<DeleteAck> {
        self.check_available()?;
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(DeleteAck::new(0));
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteAck::new(1))
            }
            None => Ok(DeleteAck::new(0)),
        }
    }
}
