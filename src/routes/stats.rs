// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::Result;
use crate::models::PublicStats;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(public_stats))
}

/// Landing-page counters.
async fn public_stats(State(state): State<Arc<AppState>>) -> Result<Json<PublicStats>> {
    Ok(Json(state.stats.public_stats().await?))
}
