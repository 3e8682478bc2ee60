// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: issue and clear the JWT cookie.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_DAYS, TOKEN_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", get(logout))
}

#[derive(Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(email)]
    email: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Session cookie with attributes matching the deployment.
///
/// Production serves the API and the SPA from different sites, which needs
/// `SameSite=None` and therefore `Secure`.
fn session_cookie(value: String, production: bool) -> Cookie<'static> {
    let same_site = if production {
        SameSite::None
    } else {
        SameSite::Strict
    };

    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(same_site)
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}

/// Sign a session token for the given email and set it as a cookie.
async fn issue_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<TokenRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>)> {
    body.validate()?;

    let token = create_jwt(&body.email, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT signing failed: {}", e)))?;

    tracing::info!(email = %body.email, "Session issued");

    Ok((
        jar.add(session_cookie(token, state.config.production)),
        Json(SuccessResponse { success: true }),
    ))
}

/// Clear the session cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let removal = session_cookie(String::new(), state.config.production);
    (jar.remove(removal), Json(SuccessResponse { success: true }))
}
