// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact-unlock ledger: persists captured payments and their approval.

use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::Deserialize;
use validator::Validate;

use crate::db::{
    collections, DataStore, DeleteResult, FindOptions, InsertOneResult, UpdateOptions,
    UpdateResult,
};
use crate::error::Result;
use crate::models::{UnlockRecord, UnlockStatus};
use crate::time_utils::now_rfc3339;

/// Captured payment reported by the client after the provider confirmed it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPayment {
    #[validate(range(min = 1))]
    pub biodata_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub transaction_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
}

#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn DataStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Record a pending unlock for `viewer_email`.
    pub async fn record(
        &self,
        viewer_email: &str,
        payment: CapturedPayment,
    ) -> Result<InsertOneResult> {
        payment.validate()?;

        let record = UnlockRecord {
            id: None,
            email: viewer_email.to_string(),
            biodata_id: payment.biodata_id,
            transaction_id: payment.transaction_id,
            amount: payment.amount,
            status: UnlockStatus::Pending,
            created_at: now_rfc3339(),
        };

        let result = self
            .store
            .insert_one(collections::PAYMENTS, bson::to_document(&record)?)
            .await?;

        tracing::info!(
            viewer = viewer_email,
            biodata_id = record.biodata_id,
            transaction_id = %record.transaction_id,
            "Unlock record created"
        );
        Ok(result)
    }

    /// Mark a record approved. The amount is left untouched.
    pub async fn approve(&self, record_id: ObjectId) -> Result<UpdateResult> {
        let result = self
            .store
            .update_one(
                collections::PAYMENTS,
                doc! { "_id": record_id },
                doc! { "status": UnlockStatus::Approved.as_str() },
                UpdateOptions::default(),
            )
            .await?;

        tracing::info!(record = %record_id, matched = result.matched_count, "Unlock approved");
        Ok(result)
    }

    /// Every record, for admin review.
    pub async fn all(&self) -> Result<Vec<Document>> {
        self.store
            .find(collections::PAYMENTS, doc! {}, FindOptions::default())
            .await
    }

    /// Delete one of the viewer's own records.
    pub async fn delete_own(&self, viewer_email: &str, record_id: ObjectId) -> Result<DeleteResult> {
        self.store
            .delete_one(
                collections::PAYMENTS,
                doc! { "_id": record_id, "email": viewer_email },
            )
            .await
    }

    /// Whether the viewer holds an approved unlock for the profile.
    pub async fn has_approved_unlock(&self, viewer_email: &str, biodata_id: i64) -> Result<bool> {
        let count = self
            .store
            .count_documents(
                collections::PAYMENTS,
                doc! {
                    "email": viewer_email,
                    "biodataId": biodata_id,
                    "status": UnlockStatus::Approved.as_str(),
                },
            )
            .await?;
        Ok(count > 0)
    }
}
