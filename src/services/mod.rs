// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod biodata;
pub mod contacts;
pub mod ledger;
pub mod premium;
pub mod stats;
pub mod stripe;
pub mod users;

pub use biodata::{BiodataQuery, BiodataService};
pub use contacts::ContactService;
pub use ledger::{CapturedPayment, LedgerService};
pub use premium::PremiumService;
pub use stats::StatsService;
pub use stripe::StripeClient;
pub use users::{NewUser, UserService};
