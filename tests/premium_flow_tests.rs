// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Premium request and approval over HTTP.

use axum::http::{Method, StatusCode};
use matrimony_server::db::collections;
use mongodb::bson::doc;
use serde_json::json;

mod common;
use common::{create_test_app, request, seed_user, send, token_for};

async fn status_of(state: &matrimony_server::AppState, email: &str) -> (String, String) {
    let doc = state
        .store
        .find_one(collections::BIODATA, doc! { "email": email })
        .await
        .unwrap()
        .expect("biodata row");
    (
        doc.get_str("premiumStatus").unwrap().to_string(),
        doc.get_str("premiumLabel").unwrap().to_string(),
    )
}

async fn biodata_doc_id(state: &matrimony_server::AppState, email: &str) -> String {
    state
        .store
        .find_one(collections::BIODATA, doc! { "email": email })
        .await
        .unwrap()
        .unwrap()
        .get_object_id("_id")
        .unwrap()
        .to_hex()
}

#[tokio::test]
async fn test_request_is_idempotent_and_upserts() {
    let (app, state) = create_test_app();
    let owner = token_for(&state, "owner@x.com");

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            request(
                Method::PATCH,
                "/biodata/premium-request/owner@x.com",
                Some(&owner),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    assert_eq!(
        status_of(&state, "owner@x.com").await,
        ("requested".to_string(), "Requested".to_string())
    );
    assert_eq!(
        state
            .store
            .count_documents(collections::BIODATA, doc! {})
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_owner_cannot_request_for_someone_else() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "a@x.com");

    let (status, _) = send(
        &app,
        request(
            Method::PATCH,
            "/biodata/premium-request/owner@x.com",
            Some(&token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(state
        .store
        .find_one(collections::BIODATA, doc! { "email": "owner@x.com" })
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_non_admin_approval_forbidden_without_mutation() {
    let (app, state) = create_test_app();
    let owner = token_for(&state, "owner@x.com");
    send(
        &app,
        request(
            Method::PATCH,
            "/biodata/premium-request/owner@x.com",
            Some(&owner),
            None,
        ),
    )
    .await;
    let id = biodata_doc_id(&state, "owner@x.com").await;

    for role in ["normal", "premium"] {
        let email = format!("{}@x.com", role);
        seed_user(&state, &email, role).await;
        let token = token_for(&state, &email);

        let (status, _) = send(
            &app,
            request(
                Method::PATCH,
                "/admin/premium-approve/owner@x.com",
                Some(&token),
                Some(json!({ "id": id })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {}", role);
    }

    assert_eq!(status_of(&state, "owner@x.com").await.0, "requested");
}

#[tokio::test]
async fn test_admin_approval_uses_body_id() {
    let (app, state) = create_test_app();
    seed_user(&state, "admin@x.com", "admin").await;
    let admin = token_for(&state, "admin@x.com");
    let owner = token_for(&state, "owner@x.com");

    send(
        &app,
        request(
            Method::PATCH,
            "/biodata/premium-request/owner@x.com",
            Some(&owner),
            None,
        ),
    )
    .await;

    let (status, pending) = send(
        &app,
        request(Method::GET, "/admin/premium-requests", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);
    let id = pending[0]["_id"].as_str().unwrap().to_string();

    // The path email does not select the profile.
    let (status, result) = send(
        &app,
        request(
            Method::PATCH,
            "/admin/premium-approve/unrelated@x.com",
            Some(&admin),
            Some(json!({ "id": id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["modifiedCount"], 1);

    assert_eq!(
        status_of(&state, "owner@x.com").await,
        ("premium".to_string(), "Verified".to_string())
    );

    // Already premium: a new request is refused and nothing changes.
    let (status, _) = send(
        &app,
        request(
            Method::PATCH,
            "/biodata/premium-request/owner@x.com",
            Some(&owner),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(status_of(&state, "owner@x.com").await.0, "premium");
}

#[tokio::test]
async fn test_approval_requires_pending_request() {
    let (app, state) = create_test_app();
    seed_user(&state, "admin@x.com", "admin").await;
    let admin = token_for(&state, "admin@x.com");
    let owner = token_for(&state, "owner@x.com");

    send(
        &app,
        request(
            Method::PUT,
            "/biodata/mine",
            Some(&owner),
            Some(json!({ "name": "Owner", "mobileNumber": "01700000000" })),
        ),
    )
    .await;
    let id = biodata_doc_id(&state, "owner@x.com").await;

    let (status, _) = send(
        &app,
        request(
            Method::PATCH,
            "/admin/premium-approve/owner@x.com",
            Some(&admin),
            Some(json!({ "id": id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(status_of(&state, "owner@x.com").await.0, "normal");

    let (status, _) = send(
        &app,
        request(
            Method::PATCH,
            "/admin/premium-approve/owner@x.com",
            Some(&admin),
            Some(json!({ "id": "not-an-object-id" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_premium_showcase_lists_approved_profiles() {
    let (app, state) = create_test_app();
    seed_user(&state, "admin@x.com", "admin").await;
    let admin = token_for(&state, "admin@x.com");
    let owner = token_for(&state, "owner@x.com");

    send(
        &app,
        request(
            Method::PUT,
            "/biodata/mine",
            Some(&owner),
            Some(json!({
                "name": "Owner",
                "gender": "Female",
                "age": 27,
                "mobileNumber": "01700000000",
            })),
        ),
    )
    .await;
    send(
        &app,
        request(
            Method::PATCH,
            "/biodata/premium-request/owner@x.com",
            Some(&owner),
            None,
        ),
    )
    .await;
    let id = biodata_doc_id(&state, "owner@x.com").await;
    send(
        &app,
        request(
            Method::PATCH,
            "/admin/premium-approve/owner@x.com",
            Some(&admin),
            Some(json!({ "id": id })),
        ),
    )
    .await;

    let (status, showcase) = send(
        &app,
        request(Method::GET, "/biodata/premium?order=desc", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(showcase.as_array().unwrap().len(), 1);
    assert_eq!(showcase[0]["name"], "Owner");
    assert!(showcase[0].get("mobileNumber").is_none());

    let (_, stats) = send(
        &app,
        request(Method::GET, "/admin/stats", Some(&admin), None),
    )
    .await;
    assert_eq!(stats["premiumBiodata"], 1);
}
