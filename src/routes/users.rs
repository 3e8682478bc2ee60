// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::users::CreateUserOutcome;
use crate::services::NewUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Account creation is called by the SPA right after sign-in, before a
/// session cookie exists.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(create_user))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/users/role/{email}", get(get_role))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<Json<CreateUserOutcome>> {
    Ok(Json(state.users.create_if_absent(body).await?))
}

#[derive(Serialize)]
pub struct RoleResponse {
    pub role: &'static str,
}

async fn get_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(email): Path<String>,
) -> Result<Json<RoleResponse>> {
    user.ensure_self(&email)?;
    let role = state.users.role_of(&email).await?;
    Ok(Json(RoleResponse {
        role: role.as_str(),
    }))
}
