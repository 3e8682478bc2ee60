// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;

/// Which document store backs the running server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// MongoDB cluster reachable at `mongodb_uri`.
    Mongo,
    /// In-process store; data is lost on restart.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Database name inside the cluster
    pub db_name: String,
    /// Selected store backend
    pub store_backend: StoreBackend,
    /// Production mode: cookies are `Secure` and `SameSite=None`
    pub production: bool,

    // --- Secrets ---
    /// MongoDB connection string (carries credentials)
    pub mongodb_uri: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Stripe secret API key
    pub stripe_secret_key: String,
}

impl Config {
    /// Config for tests: in-memory store, fixed keys, development cookies.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 5000,
            db_name: "matrimonyTest".to_string(),
            store_backend: StoreBackend::Memory,
            production: false,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            stripe_secret_key: "sk_test_dummy".to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("DATA_STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("mongo") | Err(_) => StoreBackend::Mongo,
            Ok(other) => return Err(ConfigError::Invalid("DATA_STORE", other.to_string())),
        };

        let mongodb_uri = match env::var("MONGODB_URI") {
            Ok(uri) => uri,
            Err(_) if store_backend == StoreBackend::Memory => String::new(),
            Err(_) => build_atlas_uri()?,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| "matrimonyDB".to_string()),
            store_backend,
            production: env::var("APP_ENV").is_ok_and(|v| v == "production"),

            mongodb_uri,
            jwt_signing_key: env::var("ACCESS_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET"))?
                .into_bytes(),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?,
        })
    }
}

/// Assemble an Atlas SRV connection string from discrete credentials.
fn build_atlas_uri() -> Result<String, ConfigError> {
    let user = env::var("DB_USER").map_err(|_| ConfigError::Missing("DB_USER"))?;
    let pass = env::var("DB_PASS").map_err(|_| ConfigError::Missing("DB_PASS"))?;
    let host = env::var("DB_HOST").map_err(|_| ConfigError::Missing("DB_HOST"))?;

    Ok(format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        user, pass, host
    ))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
