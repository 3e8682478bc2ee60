// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Success stories: public feed and authenticated submission.

use crate::db::{collections, documents_to_json, FindOptions, InsertOneResult, SortOrder};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::SuccessStory;
use crate::time_utils::{normalize_calendar_date, now_rfc3339};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use mongodb::bson::{self, doc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/success-stories", get(list_stories))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/success-stories/new", post(add_story))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStory {
    #[validate(range(min = 1))]
    pub self_biodata_id: i64,
    #[validate(range(min = 1))]
    pub partner_biodata_id: i64,
    #[validate(url)]
    pub couple_image: Option<String>,
    pub marriage_date: String,
    #[validate(length(min = 1, max = 2000))]
    pub review: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
}

/// Newest marriages first.
async fn list_stories(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let docs = state
        .store
        .find(
            collections::SUCCESS_STORIES,
            doc! {},
            FindOptions::sorted("marriageDate", SortOrder::Descending),
        )
        .await?;
    Ok(Json(documents_to_json(docs)))
}

async fn add_story(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NewStory>,
) -> Result<Json<InsertOneResult>> {
    body.validate()?;

    let marriage_date = normalize_calendar_date(&body.marriage_date)
        .ok_or_else(|| AppError::BadRequest("marriageDate must be YYYY-MM-DD".to_string()))?;
    if body.self_biodata_id == body.partner_biodata_id {
        return Err(AppError::BadRequest(
            "Partner biodata must differ from your own".to_string(),
        ));
    }

    let story = SuccessStory {
        id: None,
        email: user.email,
        self_biodata_id: body.self_biodata_id,
        partner_biodata_id: body.partner_biodata_id,
        couple_image: body.couple_image,
        marriage_date,
        review: body.review,
        rating: body.rating,
        created_at: now_rfc3339(),
    };

    let result = state
        .store
        .insert_one(collections::SUCCESS_STORIES, bson::to_document(&story)?)
        .await?;

    tracing::info!(
        author = %story.email,
        partner = story.partner_biodata_id,
        "Success story posted"
    );
    Ok(Json(result))
}
