//! MongoStore - DocumentStore backed by a MongoDB deployment

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database, IndexModel};
use smart_core::{
    Collection, DeleteAck, Document, DocumentStore, Filter, FindOptions, InsertAck, StoreResult,
    UpdateAck,
};

use crate::config::MongoConfig;
use crate::convert::{bson_to_json, filter_to_bson, from_bson_document, sort_to_bson, to_bson_document};
use crate::error::store_error;

/// Document store over a single shared MongoDB client
///
/// The driver pools connections internally; one `MongoStore` is created at
/// startup and shared by every request.
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect, ping, and (optionally) create indexes.
    ///
    /// Fails without retrying if the deployment cannot be reached.
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        tracing::info!(uri = %config.redacted_uri(), database = %config.database, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(store_error)?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options).map_err(store_error)?;
        let store = Self {
            database: client.database(&config.database),
            client,
        };

        store.ping().await?;
        tracing::info!("Pinged MongoDB, database is ready");

        if config.ensure_indexes {
            store.ensure_indexes().await;
        }

        Ok(store)
    }

    /// Unique index on users.email, the atomic half of duplicate-user prevention.
    ///
    /// Existing duplicate emails make the build fail; that is logged and the
    /// server keeps running on the read-then-write check alone.
    async fn ensure_indexes(&self) {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.collection(Collection::Users).create_index(index).await {
            Ok(result) => {
                tracing::info!(index = %result.index_name, "Ensured unique index on users.email")
            }
            Err(e) => tracing::warn!(error = %e, "Could not create unique index on users.email"),
        }
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<bson::Document> {
        self.database.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let coll = self.collection(collection);
        let mut action = coll.find(filter_to_bson(filter));
        if let Some(sort) = &options.sort {
            action = action.sort(sort_to_bson(sort));
        }
        if let Some(limit) = options.limit {
            action = action.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let cursor = action.await.map_err(store_error)?;
        let docs: Vec<bson::Document> = cursor.try_collect().await.map_err(store_error)?;
        Ok(docs.into_iter().map(from_bson_document).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let doc = self
            .collection(collection)
            .find_one(filter_to_bson(filter))
            .await
            .map_err(store_error)?;
        Ok(doc.map(from_bson_document))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreResult<InsertAck> {
        let result = self
            .collection(collection)
            .insert_one(to_bson_document(&document))
            .await
            .map_err(store_error)?;
        Ok(InsertAck::new(bson_to_json(result.inserted_id)))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<UpdateAck> {
        let update = doc! { "$set": to_bson_document(&set) };
        let result = self
            .collection(collection)
            .update_one(filter_to_bson(filter), update)
            .await
            .map_err(store_error)?;

        let mut ack = UpdateAck::new(result.matched_count, result.modified_count);
        if let Some(id) = result.upserted_id {
            ack.upserted_count = 1;
            ack.upserted_id = Some(bson_to_json(id));
        }
        Ok(ack)
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<DeleteAck> {
        let result = self
            .collection(collection)
            .delete_one(filter_to_bson(filter))
            .await
            .map_err(store_error)?;
        Ok(DeleteAck::new(result.deleted_count))
    }

    async fn shutdown(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}
