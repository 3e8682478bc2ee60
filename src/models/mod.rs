// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod contact;
pub mod favourite;
pub mod payment;
pub mod profile;
pub mod stats;
pub mod story;
pub mod user;

pub use contact::ContactRequest;
pub use favourite::Favourite;
pub use payment::{UnlockRecord, UnlockStatus};
pub use profile::{Biodata, BiodataDetails, Gender, PremiumStatus, TransitionError};
pub use stats::{AdminStats, PublicStats};
pub use story::SuccessStory;
pub use user::{Role, UserAccount};
