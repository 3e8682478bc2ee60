// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timestamps and calendar dates as stored in documents.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

const CALENDAR_DATE: &str = "%Y-%m-%d";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `createdAt` value for a document written now.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Convert a BSON datetime for JSON output; out-of-range values become `None`.
pub fn bson_datetime_rfc3339(value: mongodb::bson::DateTime) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis()).map(format_utc_rfc3339)
}

/// Validate a `YYYY-MM-DD` date and return it zero-padded, so string order
/// in the store is chronological order.
pub fn normalize_calendar_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), CALENDAR_DATE)
        .ok()
        .map(|d| d.format(CALENDAR_DATE).to_string())
}
