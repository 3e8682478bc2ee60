// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Biodata (matrimonial profile) model and premium lifecycle.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Premium lifecycle: `normal → requested → premium`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumStatus {
    #[default]
    Normal,
    Requested,
    Premium,
}

/// Rejected premium transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("profile is already premium")]
    AlreadyPremium,
    #[error("no premium request is pending for this profile")]
    NotRequested,
}

impl PremiumStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PremiumStatus::Normal => "normal",
            PremiumStatus::Requested => "requested",
            PremiumStatus::Premium => "premium",
        }
    }

    /// Human-readable companion shown in dashboards.
    pub fn label(self) -> &'static str {
        match self {
            PremiumStatus::Normal => "—",
            PremiumStatus::Requested => "Requested",
            PremiumStatus::Premium => "Verified",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "normal" => Some(PremiumStatus::Normal),
            "requested" => Some(PremiumStatus::Requested),
            "premium" => Some(PremiumStatus::Premium),
            _ => None,
        }
    }

    /// Owner asks for premium. Repeating the request is a no-op.
    pub fn request(self) -> Result<Self, TransitionError> {
        match self {
            PremiumStatus::Normal | PremiumStatus::Requested => Ok(PremiumStatus::Requested),
            PremiumStatus::Premium => Err(TransitionError::AlreadyPremium),
        }
    }

    /// Admin approves a pending request. Approving twice is a no-op.
    pub fn approve(self) -> Result<Self, TransitionError> {
        match self {
            PremiumStatus::Requested | PremiumStatus::Premium => Ok(PremiumStatus::Premium),
            PremiumStatus::Normal => Err(TransitionError::NotRequested),
        }
    }
}

/// Owner-editable biodata fields, validated before they reach the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BiodataDetails {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[validate(range(min = 18, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fathers_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mothers_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_partner_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_partner_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_partner_weight: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub mobile_number: String,
}

/// Stored biodata document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Biodata {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Sequential public identifier; absent on rows created by a premium
    /// request before the owner saved any details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biodata_id: Option<i64>,
    /// Owner email (upsert key)
    pub email: String,
    #[serde(flatten)]
    pub details: BiodataDetails,
    #[serde(default)]
    pub premium_status: PremiumStatus,
    #[serde(default)]
    pub premium_label: String,
}

impl Biodata {
    pub fn new(biodata_id: i64, email: &str, details: BiodataDetails) -> Self {
        Self {
            id: None,
            biodata_id: Some(biodata_id),
            email: email.to_string(),
            details,
            premium_status: PremiumStatus::Normal,
            premium_label: PremiumStatus::Normal.label().to_string(),
        }
    }
}
