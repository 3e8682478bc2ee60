// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dashboard routes.
//!
//! Mounted behind both `require_auth` and `require_admin` in routes/mod.rs.

use crate::db::{documents_to_json, parse_object_id, UpdateResult};
use crate::error::Result;
use crate::models::{AdminStats, Role};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}/role", patch(set_role))
        .route("/admin/premium-requests", get(premium_requests))
        .route("/admin/premium-approve/{email}", patch(approve_premium))
        .route("/admin/contact-requests", get(contact_requests))
        .route("/admin/contact-requests/{id}", patch(approve_contact_request))
        .route("/admin/stats", get(admin_stats))
}

#[derive(Deserialize)]
pub struct UserSearch {
    search: Option<String>,
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserSearch>,
) -> Result<Json<Value>> {
    let users = state.users.list(query.search.as_deref()).await?;
    Ok(Json(documents_to_json(users)))
}

#[derive(Deserialize)]
pub struct RoleChange {
    role: Role,
}

async fn set_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RoleChange>,
) -> Result<Json<UpdateResult>> {
    let id = parse_object_id(&id)?;
    Ok(Json(state.users.set_role(id, body.role).await?))
}

async fn premium_requests(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let pending = state.premium.pending_requests().await?;
    Ok(Json(documents_to_json(pending)))
}

/// Body of a premium approval; `id` is the biodata document id.
#[derive(Deserialize)]
pub struct ApprovePremium {
    id: String,
}

/// Approve a premium request. The profile is located by the body `id`; the
/// path email is informational only.
async fn approve_premium(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(body): Json<ApprovePremium>,
) -> Result<Json<UpdateResult>> {
    let id = parse_object_id(&body.id)?;
    tracing::debug!(path_email = %email, biodata = %id, "Premium approval");
    Ok(Json(state.premium.approve(id).await?))
}

async fn contact_requests(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let records = state.ledger.all().await?;
    Ok(Json(documents_to_json(records)))
}

async fn approve_contact_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>> {
    let id = parse_object_id(&id)?;
    Ok(Json(state.ledger.approve(id).await?))
}

async fn admin_stats(State(state): State<Arc<AppState>>) -> Result<Json<AdminStats>> {
    Ok(Json(state.stats.admin_stats().await?))
}
