// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Success stories (completed unions).

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessStory {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Author email
    pub email: String,
    pub self_biodata_id: i64,
    pub partner_biodata_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple_image: Option<String>,
    /// Marriage date (YYYY-MM-DD)
    pub marriage_date: String,
    pub review: String,
    /// Star rating 1-5
    pub rating: u8,
    /// When the story was posted (ISO 8601)
    pub created_at: String,
}
