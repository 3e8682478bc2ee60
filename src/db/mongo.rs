// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MongoDB-backed document store.
//!
//! One client is created at startup and shared by every handler; the driver
//! pools connections internally. Pipelines are rendered with
//! [`Stage::to_document`] and executed server-side.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};

use crate::db::pipeline::Stage;
use crate::db::store::{
    DataStore, DeleteResult, FindOptions, InsertOneResult, SortOrder, UpdateOptions, UpdateResult,
};
use crate::error::AppError;

/// MongoDB database handle.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| AppError::Database(format!("Invalid MongoDB URI: {}", e)))?;
        options.app_name = Some("matrimony-server".to_string());
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)
            .map_err(|e| AppError::Database(format!("Failed to create MongoDB client: {}", e)))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        tracing::info!(database = db_name, "Connected to MongoDB");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DataStore for MongoStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, AppError> {
        let coll = self.collection(collection);
        let mut action = coll.find(filter);
        if let Some((field, order)) = options.sort {
            let direction = match order {
                SortOrder::Ascending => 1,
                SortOrder::Descending => -1,
            };
            let mut sort = Document::new();
            sort.insert(field, direction);
            action = action.sort(sort);
        }
        if let Some(limit) = options.limit {
            action = action.limit(limit);
        }

        let cursor = action.await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn insert_one(
        &self,
        collection: &str,
        doc: Document,
    ) -> Result<InsertOneResult, AppError> {
        let result = self.collection(collection).insert_one(doc).await?;
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
        options: UpdateOptions,
    ) -> Result<UpdateResult, AppError> {
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": set })
            .upsert(options.upsert)
            .await?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id,
        })
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteResult, AppError> {
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection(collection).count_documents(filter).await?)
    }

    async fn estimated_count(&self, collection: &str) -> Result<u64, AppError> {
        Ok(self
            .collection(collection)
            .estimated_document_count()
            .await?)
    }

    async fn aggregate(
        &self,
        collection: &str,
        stages: &[Stage],
    ) -> Result<Vec<Document>, AppError> {
        let pipeline: Vec<Document> = stages.iter().map(Stage::to_document).collect();
        let cursor = self.collection(collection).aggregate(pipeline).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }
}
