// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Backs offline tests and `DATA_STORE=memory` runs. Collections live in a
//! [`DashMap`] so handlers can share one store without a global lock; each
//! operation touches a single shard and never holds a guard across an await.

use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::db::pipeline::{self, Stage};
use crate::db::store::{
    DataStore, DeleteResult, FindOptions, InsertOneResult, SortOrder, UpdateOptions, UpdateResult,
};
use crate::error::AppError;

/// Document store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a collection's documents.
    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| docs.value().clone())
            .unwrap_or_default()
    }
}

/// Fields of an upsert filter that become part of the inserted document.
fn equality_fields(filter: &Document) -> Document {
    let mut seed = Document::new();
    for (path, condition) in filter {
        if path.starts_with('$') {
            continue;
        }
        let value = match condition {
            Bson::Document(d) if d.keys().all(|k| k.starts_with('$')) => match d.get("$eq") {
                Some(v) => v.clone(),
                None => continue,
            },
            other => other.clone(),
        };
        pipeline::set_path(&mut seed, path, value);
    }
    seed
}

/// Apply `$set` fields, returning whether anything changed.
fn apply_set(doc: &mut Document, set: &Document) -> bool {
    let mut changed = false;
    for (path, value) in set {
        if pipeline::get_path(doc, path) != Some(value) {
            pipeline::set_path(doc, path, value.clone());
            changed = true;
        }
    }
    changed
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|doc| pipeline::matches(doc, &filter))
                .cloned()
        }))
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, AppError> {
        let mut found: Vec<Document> = self
            .snapshot(collection)
            .into_iter()
            .filter(|doc| pipeline::matches(doc, &filter))
            .collect();

        if let Some((field, order)) = &options.sort {
            found.sort_by(|a, b| {
                let ordering =
                    pipeline::sort_compare(pipeline::get_path(a, field), pipeline::get_path(b, field));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = options.limit.filter(|l| *l > 0) {
            found.truncate(limit as usize);
        }

        Ok(found)
    }

    async fn insert_one(
        &self,
        collection: &str,
        doc: Document,
    ) -> Result<InsertOneResult, AppError> {
        let id = doc
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

        let mut docs = self.collections.entry(collection.to_string()).or_default();
        if docs
            .iter()
            .any(|existing| existing.get("_id").is_some_and(|e| pipeline::values_equal(e, &id)))
        {
            return Err(AppError::Database(format!(
                "E11000 duplicate key error collection: {} _id: {}",
                collection, id
            )));
        }

        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (key, value) in doc {
            if key != "_id" {
                stored.insert(key, value);
            }
        }
        docs.push(stored);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        set: Document,
        options: UpdateOptions,
    ) -> Result<UpdateResult, AppError> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| pipeline::matches(doc, &filter)) {
            let changed = apply_set(doc, &set);
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(changed),
                upserted_id: None,
            });
        }

        if !options.upsert {
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
            });
        }

        let mut seed = equality_fields(&filter);
        apply_set(&mut seed, &set);
        let id = seed
            .remove("_id")
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (key, value) in seed {
            stored.insert(key, value);
        }
        docs.push(stored);

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteResult, AppError> {
        let deleted_count = match self.collections.get_mut(collection) {
            Some(mut docs) => match docs.iter().position(|doc| pipeline::matches(doc, &filter)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64, AppError> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| pipeline::matches(doc, &filter)).count())
            .unwrap_or(0) as u64)
    }

    async fn estimated_count(&self, collection: &str) -> Result<u64, AppError> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0) as u64)
    }

    async fn aggregate(
        &self,
        collection: &str,
        stages: &[Stage],
    ) -> Result<Vec<Document>, AppError> {
        // Snapshot first so `$lookup` never reads a shard this call still holds.
        let docs = self.snapshot(collection);
        let resolve = |name: &str| self.snapshot(name);
        Ok(pipeline::evaluate(stages, docs, &resolve))
    }
}
