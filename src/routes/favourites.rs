// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favourite profiles saved by a viewer.

use crate::db::{
    collections, documents_to_json, parse_object_id, DeleteResult, FindOptions, InsertOneResult,
};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Favourite;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use mongodb::bson::{self, doc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/favourites", post(add_favourite))
        .route("/favourites/{email}", get(list_favourites))
        .route("/favourite/{id}", delete(remove_favourite))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFavourite {
    #[validate(range(min = 1))]
    pub biodata_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub occupation: Option<String>,
    pub permanent_division: Option<String>,
}

async fn list_favourites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(email): Path<String>,
) -> Result<Json<Value>> {
    user.ensure_self(&email)?;
    let docs = state
        .store
        .find(
            collections::FAVOURITES,
            doc! { "email": email.as_str() },
            FindOptions::default(),
        )
        .await?;
    Ok(Json(documents_to_json(docs)))
}

async fn add_favourite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NewFavourite>,
) -> Result<Json<InsertOneResult>> {
    body.validate()?;

    let favourite = Favourite {
        id: None,
        email: user.email,
        biodata_id: body.biodata_id,
        name: body.name,
        occupation: body.occupation,
        permanent_division: body.permanent_division,
    };
    let result = state
        .store
        .insert_one(collections::FAVOURITES, bson::to_document(&favourite)?)
        .await?;
    Ok(Json(result))
}

/// Delete a favourite. Only the viewer who saved it can remove it; other
/// ids simply report zero deletions.
async fn remove_favourite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id = parse_object_id(&id)?;
    let result = state
        .store
        .delete_one(
            collections::FAVOURITES,
            doc! { "_id": id, "email": user.email.as_str() },
        )
        .await?;
    Ok(Json(result))
}
