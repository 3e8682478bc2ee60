//! Dashboard statistics.
//!
//! Recomputed from the live store on every request. Totals come from the
//! store's estimated count while the per-gender and premium figures are exact
//! filtered counts, so under concurrent writes `male + female` may briefly
//! disagree with `total_biodata`.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Public landing-page counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PublicStats {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_biodata: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub male_biodata: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub female_biodata: u64,
    /// Success stories posted
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_marriages: u64,
}

/// Admin dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminStats {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_biodata: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub male_biodata: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub female_biodata: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub premium_biodata: u64,
    /// Sum of every unlock record's amount
    pub total_revenue: f64,
}
