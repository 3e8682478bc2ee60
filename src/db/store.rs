// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store interface shared by the MongoDB and in-process backends.
//!
//! Filters use the MongoDB query language subset understood by
//! [`crate::db::pipeline::matches`]. Updates always have `$set` semantics.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde::{Serialize, Serializer};

use crate::db::pipeline::Stage;
use crate::error::AppError;

/// Sort direction for [`FindOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Options for [`DataStore::find`].
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Single sort key (dotted path) and direction.
    pub sort: Option<(String, SortOrder)>,
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn sorted(field: &str, order: SortOrder) -> Self {
        Self {
            sort: Some((field.to_string(), order)),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for [`DataStore::update_one`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Insert a new document when nothing matches the filter.
    pub upsert: bool,
}

impl UpdateOptions {
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

fn serialize_bson<S: Serializer>(value: &Bson, serializer: S) -> Result<S::Ok, S::Error> {
    crate::db::bson_to_json(value.clone()).serialize(serializer)
}

fn serialize_opt_bson<S: Serializer>(
    value: &Option<Bson>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value
        .clone()
        .map(crate::db::bson_to_json)
        .serialize(serializer)
}

/// Acknowledgement of an insert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_bson")]
    pub inserted_id: Bson,
}

/// Acknowledgement of an update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(serialize_with = "serialize_opt_bson")]
    pub upserted_id: Option<Bson>,
}

/// Acknowledgement of a delete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Long-lived document store handle, shared by every request handler.
///
/// Implementations must be safe for concurrent use; no ordering is
/// guaranteed between two writers racing on the same document.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn find_one(&self, collection: &str, filter: Document)
        -> Result<Option<Document>, AppError>;

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, AppError>;

    async fn insert_one(&self, collection: &str, doc: Document)
        -> Result<InsertOneResult, AppError>;

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
        options: UpdateOptions,
    ) -> Result<UpdateResult, AppError>;

    async fn delete_one(&self, collection: &str, filter: Document)
        -> Result<DeleteResult, AppError>;

    /// Exact count of documents matching `filter`.
    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64, AppError>;

    /// Fast total count from collection metadata; may lag concurrent writes.
    async fn estimated_count(&self, collection: &str) -> Result<u64, AppError>;

    async fn aggregate(&self, collection: &str, stages: &[Stage])
        -> Result<Vec<Document>, AppError>;
}
