// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication and role middleware.

use crate::error::AppError;
use crate::models::Role;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const TOKEN_COOKIE: &str = "token";

/// Session lifetime in days.
pub const SESSION_DAYS: i64 = 15;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

impl AuthUser {
    /// Reject access to another account's resources.
    pub fn ensure_self(&self, email: &str) -> Result<(), AppError> {
        if self.email == email {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Token does not belong to this account".to_string(),
            ))
        }
    }
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(t) => t.to_string(),
            None => return Err(AppError::Unauthorized),
        }
    };

    let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(&token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    if token_data.claims.email.is_empty() {
        return Err(AppError::InvalidToken);
    }

    let auth_user = AuthUser {
        email: token_data.claims.email,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Middleware that requires the authenticated account to hold the admin role.
///
/// Must run after [`require_auth`]. The role is read from the store on every
/// request, so promotions take effect without re-login.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let email = request
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.email.clone())
        .ok_or(AppError::Unauthorized)?;

    let role = state.users.role_of(&email).await?;
    if role != Role::Admin {
        tracing::warn!(email = %email, role = role.as_str(), "Admin route refused");
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(email: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        email: email.to_string(),
        iat: now,
        exp: now + SESSION_DAYS as usize * 24 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let key = b"test_jwt_key_32_bytes_minimum!!";
        let token = create_jwt("a@x.com", key).unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(key),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(data.claims.email, "a@x.com");
        assert_eq!(
            data.claims.exp - data.claims.iat,
            SESSION_DAYS as usize * 86400
        );
    }

    #[test]
    fn test_ensure_self() {
        let user = AuthUser {
            email: "a@x.com".to_string(),
        };
        assert!(user.ensure_self("a@x.com").is_ok());
        assert!(matches!(
            user.ensure_self("b@x.com"),
            Err(AppError::Forbidden(_))
        ));
    }
}
