// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use matrimony_server::config::Config;
use matrimony_server::db::{collections, MemoryStore};
use matrimony_server::middleware::auth::create_jwt;
use matrimony_server::routes::create_router;
use matrimony_server::AppState;
use mongodb::bson::doc;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if a MongoDB test deployment is available via environment variable.
#[allow(dead_code)]
pub fn mongo_available() -> bool {
    std::env::var("MONGODB_TEST_URI").is_ok()
}

/// Skip test with message if no MongoDB test deployment is configured.
#[macro_export]
macro_rules! require_mongo {
    () => {
        if !crate::common::mongo_available() {
            eprintln!("⚠️  Skipping: MONGODB_TEST_URI not set");
            return;
        }
    };
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(config, store));
    (create_router(state.clone()), state)
}

/// Session token for `email` signed with the test key.
#[allow(dead_code)]
pub fn token_for(state: &AppState, email: &str) -> String {
    create_jwt(email, &state.config.jwt_signing_key).unwrap()
}

/// Insert an account with the given role directly into the store.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, email: &str, role: &str) {
    state
        .store
        .insert_one(
            collections::USERS,
            doc! { "email": email, "name": email, "role": role },
        )
        .await
        .unwrap();
}

/// Build a request with an optional bearer token and JSON body.
#[allow(dead_code)]
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request and decode the JSON body (`Null` when empty or not JSON).
#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
