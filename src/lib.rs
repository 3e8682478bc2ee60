// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Matrimony server: biodata, favourites, success stories, premium
//! upgrades and paid contact unlocking over a document store.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::DataStore;
use services::{
    BiodataService, ContactService, LedgerService, PremiumService, StatsService, StripeClient,
    UserService,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DataStore>,
    pub users: UserService,
    pub biodata: BiodataService,
    pub premium: PremiumService,
    pub ledger: LedgerService,
    pub contacts: ContactService,
    pub stats: StatsService,
    pub stripe: StripeClient,
}

impl AppState {
    /// Wire every service to the one shared store.
    pub fn new(config: Config, store: Arc<dyn DataStore>) -> Self {
        let stripe = StripeClient::new(config.stripe_secret_key.clone());
        Self {
            users: UserService::new(store.clone()),
            biodata: BiodataService::new(store.clone()),
            premium: PremiumService::new(store.clone()),
            ledger: LedgerService::new(store.clone()),
            contacts: ContactService::new(store.clone()),
            stats: StatsService::new(store.clone()),
            stripe,
            store,
            config,
        }
    }
}
