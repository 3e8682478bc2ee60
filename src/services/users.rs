// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User accounts and role lookup.

use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{collections, DataStore, FindOptions, InsertOneResult, UpdateOptions, UpdateResult};
use crate::error::{AppError, Result};
use crate::models::{Role, UserAccount};
use crate::time_utils::now_rfc3339;

/// Body of the first-login account creation call.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(url)]
    pub photo: Option<String>,
}

/// Outcome of [`UserService::create_if_absent`]: the store acknowledgement
/// or a notice that the account already exists.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CreateUserOutcome {
    Created(InsertOneResult),
    #[serde(rename_all = "camelCase")]
    Existing {
        message: String,
        inserted_id: Option<String>,
    },
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DataStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Create the account on first login; later logins are no-ops.
    pub async fn create_if_absent(&self, new_user: NewUser) -> Result<CreateUserOutcome> {
        new_user.validate()?;

        let existing = self
            .store
            .find_one(collections::USERS, doc! { "email": new_user.email.as_str() })
            .await?;
        if existing.is_some() {
            return Ok(CreateUserOutcome::Existing {
                message: "user already exists".to_string(),
                inserted_id: None,
            });
        }

        let account = UserAccount {
            id: None,
            email: new_user.email,
            name: new_user.name,
            photo: new_user.photo,
            role: Role::Normal,
            created_at: now_rfc3339(),
        };
        let result = self
            .store
            .insert_one(collections::USERS, bson::to_document(&account)?)
            .await?;

        tracing::info!(email = %account.email, "User account created");
        Ok(CreateUserOutcome::Created(result))
    }

    /// Role of the account with `email`; unknown accounts are `normal`.
    pub async fn role_of(&self, email: &str) -> Result<Role> {
        let account = self
            .store
            .find_one(collections::USERS, doc! { "email": email })
            .await?;

        Ok(account
            .and_then(|d| d.get_str("role").ok().and_then(Role::parse))
            .unwrap_or_default())
    }

    /// All accounts, optionally filtered by a case-insensitive name fragment.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Document>> {
        let users = self
            .store
            .find(collections::USERS, doc! {}, FindOptions::default())
            .await?;

        let Some(needle) = search.map(str::to_lowercase).filter(|s| !s.is_empty()) else {
            return Ok(users);
        };

        Ok(users
            .into_iter()
            .filter(|u| {
                u.get_str("name")
                    .is_ok_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Promote an account. Demotion to `normal` is not offered.
    pub async fn set_role(&self, account_id: ObjectId, role: Role) -> Result<UpdateResult> {
        if role == Role::Normal {
            return Err(AppError::BadRequest(
                "Accounts can only be promoted to premium or admin".to_string(),
            ));
        }

        let result = self
            .store
            .update_one(
                collections::USERS,
                doc! { "_id": account_id },
                doc! { "role": role.as_str() },
                UpdateOptions::default(),
            )
            .await?;

        tracing::info!(account = %account_id, role = role.as_str(), "Role updated");
        Ok(result)
    }
}
