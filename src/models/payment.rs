// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unlock records: payments that reveal a profile's contact details.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnlockStatus {
    #[default]
    Pending,
    Approved,
}

impl UnlockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UnlockStatus::Pending => "Pending",
            UnlockStatus::Approved => "Approved",
        }
    }
}

/// Stored unlock record. `amount` never changes after capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Viewer who paid
    pub email: String,
    /// Target profile's `biodataId`
    pub biodata_id: i64,
    /// Payment provider transaction id
    pub transaction_id: String,
    pub amount: f64,
    #[serde(default)]
    pub status: UnlockStatus,
    /// When the payment was captured (ISO 8601)
    #[serde(default)]
    pub created_at: String,
}
