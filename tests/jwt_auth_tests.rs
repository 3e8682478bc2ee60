// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that tokens issued by `POST /jwt` are accepted by the
//! auth middleware, and that expired tokens are not.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use matrimony_server::middleware::auth::{create_jwt, Claims, SESSION_DAYS};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

mod common;
use common::{create_test_app, request, send};

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

#[test]
fn test_jwt_expiration_matches_session_length() {
    let signing_key = b"test_signing_key_32_bytes_long!!";
    let token = create_jwt("a@x.com", signing_key).unwrap();

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually
    let token_data =
        decode::<Claims>(&token, &DecodingKey::from_secret(signing_key), &validation).unwrap();

    let days = SESSION_DAYS as usize;
    assert!(token_data.claims.exp > now() + 86400 * (days - 1));
    assert!(token_data.claims.exp <= now() + 86400 * days);
}

#[tokio::test]
async fn test_issued_cookie_authenticates() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/jwt",
            None,
            Some(json!({ "email": "a@x.com" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let pair = set_cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with("token="));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/role/a@x.com")
                .header(header::COOKIE, pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["role"], "normal");
}

#[tokio::test]
async fn test_jwt_request_requires_valid_email() {
    let (app, _) = create_test_app();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/jwt",
            None,
            Some(json!({ "email": "not an email" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (app, state) = create_test_app();

    let claims = Claims {
        email: "a@x.com".to_string(),
        iat: now() - 86400 * 20,
        exp: now() - 86400 * 5,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&state.config.jwt_signing_key),
    )
    .unwrap();

    let (status, body) = send(
        &app,
        request(Method::GET, "/favourites/a@x.com", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_token_without_email_rejected() {
    let (app, state) = create_test_app();
    let token = create_jwt("", &state.config.jwt_signing_key).unwrap();

    let (status, _) = send(
        &app,
        request(Method::GET, "/favourites/a@x.com", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
