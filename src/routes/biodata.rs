// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Biodata routes: public browsing, owner editing and premium requests.

use crate::db::{document_to_json, documents_to_json, SortOrder, UpdateResult};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{BiodataDetails, Role};
use crate::services::biodata::strip_contact_fields;
use crate::services::BiodataQuery;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/biodata", get(list_biodata))
        .route("/biodata/premium", get(premium_biodata))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/biodata/id/{biodata_id}", get(get_biodata))
        .route("/biodata/mine", put(save_biodata))
        .route("/biodata/mine/{email}", get(get_own_biodata))
        .route("/biodata/premium-request/{email}", patch(request_premium))
}

async fn list_biodata(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BiodataQuery>,
) -> Result<Json<Value>> {
    let docs = state.biodata.list(&query).await?;
    Ok(Json(documents_to_json(docs)))
}

#[derive(Deserialize)]
pub struct ShowcaseQuery {
    #[serde(default)]
    order: Option<String>,
}

/// Premium showcase; `?order=desc` lists the oldest first.
async fn premium_biodata(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShowcaseQuery>,
) -> Result<Json<Value>> {
    let order = match query.order.as_deref() {
        Some("desc") => SortOrder::Descending,
        _ => SortOrder::Ascending,
    };
    let docs = state.biodata.premium_showcase(order).await?;
    Ok(Json(documents_to_json(docs)))
}

/// Profile detail. Contact fields are only included for the owner, premium
/// members, admins and viewers holding an approved unlock.
async fn get_biodata(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(biodata_id): Path<i64>,
) -> Result<Json<Value>> {
    let Some(doc) = state.biodata.by_biodata_id(biodata_id).await? else {
        return Ok(Json(Value::Null));
    };

    let is_owner = doc.get_str("email").is_ok_and(|e| e == user.email);
    let visible = is_owner
        || matches!(
            state.users.role_of(&user.email).await?,
            Role::Premium | Role::Admin
        )
        || state
            .ledger
            .has_approved_unlock(&user.email, biodata_id)
            .await?;

    let doc = if visible {
        doc
    } else {
        strip_contact_fields(doc)
    };
    Ok(Json(document_to_json(doc)))
}

async fn get_own_biodata(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(email): Path<String>,
) -> Result<Json<Value>> {
    user.ensure_self(&email)?;
    let doc = state.biodata.by_owner(&email).await?;
    Ok(Json(doc.map(document_to_json).unwrap_or(Value::Null)))
}

/// Create or edit the caller's biodata. The owner is always the token's
/// email; an `email` in the body is ignored.
async fn save_biodata(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(details): Json<BiodataDetails>,
) -> Result<Json<UpdateResult>> {
    Ok(Json(state.biodata.save(&user.email, details).await?))
}

async fn request_premium(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(email): Path<String>,
) -> Result<Json<UpdateResult>> {
    user.ensure_self(&email)?;
    Ok(Json(state.premium.request(&email).await?))
}
