// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stripe API client for creating payment intents.
//!
//! Only intent creation happens server-side. The browser confirms the card
//! payment with the returned client secret and then reports the captured
//! transaction to `/payments`.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

const CURRENCY: &str = "usd";

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

/// Subset of Stripe's PaymentIntent object.
#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Response body for the browser.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Convert a decimal amount to Stripe's integer minor units (cents).
pub fn to_minor_units(amount: f64) -> Result<i64, AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::BadRequest(
            "Amount must be a positive number".to_string(),
        ));
    }
    let cents = (amount * 100.0).round();
    if cents < 1.0 || cents > i64::MAX as f64 {
        return Err(AppError::BadRequest("Amount out of range".to_string()));
    }
    Ok(cents as i64)
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self::with_base_url(secret_key, "https://api.stripe.com/v1".to_string())
    }

    pub fn with_base_url(secret_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            secret_key,
        }
    }

    /// Create a card PaymentIntent for `amount` dollars.
    pub async fn create_payment_intent(&self, amount: f64) -> Result<PaymentIntent, AppError> {
        let minor_units = to_minor_units(amount)?;
        let url = format!("{}/payment_intents", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", minor_units.to_string()),
                ("currency", CURRENCY.to_string()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Request failed: {}", e)))?;

        let intent: PaymentIntent = self.check_response_json(response).await?;
        tracing::info!(intent = %intent.id, amount = minor_units, "Payment intent created");
        Ok(intent)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);

            return Err(AppError::PaymentProvider(format!(
                "HTTP {}: {}",
                status, message
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Invalid response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units_rounds_to_cents() {
        assert_eq!(to_minor_units(20.0).unwrap(), 2000);
        assert_eq!(to_minor_units(19.999).unwrap(), 2000);
        assert_eq!(to_minor_units(0.01).unwrap(), 1);
    }

    #[test]
    fn test_to_minor_units_rejects_non_positive() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY, 0.001] {
            assert!(
                matches!(to_minor_units(bad), Err(AppError::BadRequest(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider_maps_to_payment_error() {
        let client = StripeClient::with_base_url(
            "sk_test".to_string(),
            "http://127.0.0.1:9".to_string(),
        );
        let err = client.create_payment_intent(20.0).await.unwrap_err();
        assert!(matches!(err, AppError::PaymentProvider(_)));
    }
}
