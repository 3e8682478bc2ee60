// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unlocked contact view returned to the paying viewer.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::UnlockStatus;

/// One unlock record joined with the target profile's contact fields.
///
/// Contact fields are optional because the profile may never have filled
/// them in; the row itself only exists when the profile does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContactRequest {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub biodata_id: i64,
    pub transaction_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "\"Pending\" | \"Approved\""))]
    pub status: UnlockStatus,
    /// Viewer email
    pub email: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
}
