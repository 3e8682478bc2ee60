// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact-unlock payments and the viewer's unlocked contacts.

use crate::db::{parse_object_id, DeleteResult, InsertOneResult};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::ContactRequest;
use crate::services::stripe::PaymentIntentResponse;
use crate::services::CapturedPayment;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/payments", post(record_payment))
        .route("/contact-requests/{email}", get(list_contact_requests))
        .route("/contact-request/{id}", delete(delete_contact_request))
}

#[derive(Deserialize)]
pub struct PaymentIntentRequest {
    pub amount: f64,
}

async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>> {
    let intent = state.stripe.create_payment_intent(body.amount).await?;
    tracing::debug!(viewer = %user.email, intent = %intent.id, "Payment intent issued");
    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Store the captured payment as a pending unlock for the caller.
async fn record_payment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CapturedPayment>,
) -> Result<Json<InsertOneResult>> {
    Ok(Json(state.ledger.record(&user.email, body).await?))
}

/// Unlock records of the caller joined with the target profiles' contacts.
async fn list_contact_requests(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(email): Path<String>,
) -> Result<Json<Vec<ContactRequest>>> {
    user.ensure_self(&email)?;
    Ok(Json(state.contacts.unlocked_contacts(&email).await?))
}

async fn delete_contact_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id = parse_object_id(&id)?;
    Ok(Json(state.ledger.delete_own(&user.email, id).await?))
}
