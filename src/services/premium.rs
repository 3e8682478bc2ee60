// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Premium request and approval.
//!
//! Status and label are written together so dashboards never see one without
//! the other. The read-check-write sequence is not atomic; two racing writers
//! resolve last-write-wins in the store.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::db::{collections, DataStore, FindOptions, UpdateOptions, UpdateResult};
use crate::error::{AppError, Result};
use crate::models::PremiumStatus;

#[derive(Clone)]
pub struct PremiumService {
    store: Arc<dyn DataStore>,
}

/// Current premium status of a stored biodata document.
fn status_of(doc: Option<&Document>) -> PremiumStatus {
    doc.and_then(|d| d.get_str("premiumStatus").ok())
        .and_then(PremiumStatus::parse)
        .unwrap_or_default()
}

fn status_fields(status: PremiumStatus) -> Document {
    doc! {
        "premiumStatus": status.as_str(),
        "premiumLabel": status.label(),
    }
}

impl PremiumService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Owner requests premium (`normal → requested`).
    ///
    /// Upserts by owner email, so it works before the owner has saved a
    /// biodata. Repeating the request succeeds without changes.
    pub async fn request(&self, owner_email: &str) -> Result<UpdateResult> {
        let filter = doc! { "email": owner_email };
        let current = self
            .store
            .find_one(collections::BIODATA, filter.clone())
            .await?;

        let next = status_of(current.as_ref())
            .request()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let result = self
            .store
            .update_one(
                collections::BIODATA,
                filter,
                status_fields(next),
                UpdateOptions::upsert(),
            )
            .await?;

        tracing::info!(owner = owner_email, "Premium requested");
        Ok(result)
    }

    /// Admin approves a pending request (`requested → premium`).
    ///
    /// The caller must already be verified as an admin.
    pub async fn approve(&self, biodata_doc_id: ObjectId) -> Result<UpdateResult> {
        let filter = doc! { "_id": biodata_doc_id };
        let current = self
            .store
            .find_one(collections::BIODATA, filter.clone())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Biodata {} not found", biodata_doc_id)))?;

        let next = status_of(Some(&current))
            .approve()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let result = self
            .store
            .update_one(
                collections::BIODATA,
                filter,
                status_fields(next),
                UpdateOptions::default(),
            )
            .await?;

        tracing::info!(biodata = %biodata_doc_id, "Premium approved");
        Ok(result)
    }

    /// Profiles waiting for approval.
    pub async fn pending_requests(&self) -> Result<Vec<Document>> {
        self.store
            .find(
                collections::BIODATA,
                doc! { "premiumStatus": PremiumStatus::Requested.as_str() },
                FindOptions::default(),
            )
            .await
    }
}
