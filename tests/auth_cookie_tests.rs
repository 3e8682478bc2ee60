// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth cookie attribute tests.
//!
//! These tests verify that the session cookie set by `/jwt` and removed by
//! `/logout` carries matching attributes in development and production.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use matrimony_server::config::Config;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app_with_config, request};

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

fn app(production: bool) -> axum::Router {
    let config = Config {
        production,
        ..Config::test_default()
    };
    create_test_app_with_config(config).0
}

async fn issue(app: axum::Router) -> String {
    let response = app
        .oneshot(request(
            Method::POST,
            "/jwt",
            None,
            Some(json!({ "email": "a@x.com" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    find_cookie(&set_cookie_headers(&response), "token")
}

async fn logout(app: axum::Router) -> String {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/logout")
                .header(header::COOKIE, "token=test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    find_cookie(&set_cookie_headers(&response), "token")
}

#[tokio::test]
async fn test_session_cookie_development_attributes() {
    let cookie = issue(app(false)).await;

    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=1296000"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_session_cookie_production_attributes() {
    let cookie = issue(app(true)).await;

    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=None"));
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_logout_cookie_removal_development_attributes() {
    let cookie = logout(app(false)).await;

    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_logout_cookie_removal_production_attributes() {
    let cookie = logout(app(true)).await;

    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=None"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Secure"));
}
