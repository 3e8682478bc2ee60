// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile join service.
//!
//! Joins a viewer's unlock records with the referenced profiles' contact
//! fields. The join runs inside the store as a single pipeline:
//! 1. `$match` the viewer's records
//! 2. `$lookup` the biodata whose `biodataId` equals the record's target
//! 3. `$unwind` the joined array, dropping records whose profile is gone
//! 4. `$project` the flattened view without internal ids

use std::sync::Arc;

use mongodb::bson::{self, doc};

use crate::db::{collections, DataStore, Projection, Stage};
use crate::error::{AppError, Result};
use crate::models::ContactRequest;

const JOINED_PROFILE: &str = "profile";

/// Computes the contact details a viewer has paid to unlock.
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn DataStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Pipeline producing a viewer's unlocked contacts.
    pub fn pipeline(viewer_email: &str) -> Vec<Stage> {
        let joined = |field: &str| Projection::Field(format!("{}.{}", JOINED_PROFILE, field));

        vec![
            Stage::Match(doc! { "email": viewer_email }),
            Stage::lookup(
                collections::BIODATA,
                "biodataId",
                "biodataId",
                JOINED_PROFILE,
            ),
            Stage::Unwind(JOINED_PROFILE.to_string()),
            Stage::Project(vec![
                ("_id".to_string(), Projection::Exclude),
                ("biodataId".to_string(), Projection::Include),
                ("transactionId".to_string(), Projection::Include),
                ("status".to_string(), Projection::Include),
                ("email".to_string(), Projection::Include),
                ("mobileNumber".to_string(), joined("mobileNumber")),
                ("contactEmail".to_string(), joined("email")),
                ("contactName".to_string(), joined("name")),
            ]),
        ]
    }

    /// Every unlock record owned by `viewer_email`, enriched with contact
    /// fields. Records pointing at a missing profile are silently omitted.
    /// Order follows the store and is not stable across calls.
    pub async fn unlocked_contacts(&self, viewer_email: &str) -> Result<Vec<ContactRequest>> {
        if viewer_email.is_empty() {
            return Err(AppError::BadRequest("Viewer email is required".to_string()));
        }

        let rows = self
            .store
            .aggregate(collections::PAYMENTS, &Self::pipeline(viewer_email))
            .await?;

        tracing::debug!(
            viewer = viewer_email,
            count = rows.len(),
            "Joined unlock records with profiles"
        );

        rows.into_iter()
            .map(|row| bson::from_document(row).map_err(AppError::from))
            .collect()
    }
}
