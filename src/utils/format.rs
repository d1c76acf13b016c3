//! Display formatting for ledger values
//!
//! One fixed convention: two decimals followed by `$`, dates in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::models::Amount;

pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a remote timestamp.
///
/// Accepts RFC 3339, ISO-8601 date-times with or without an offset (naive
/// values are taken as UTC) and bare dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `"Aug 5, 2025, 13:45"`, or `"Invalid Date"` when the value cannot be parsed
pub fn format_date(value: &str) -> String {
    match parse_timestamp(value) {
        Some(date) => date.format("%b %-d, %Y, %H:%M").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// `"85.00 $"`
pub fn format_money(value: f64) -> String {
    // avoid printing "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2} $", value)
}

/// `"32%"`
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.0}%", ratio.round())
}

/// Amount as listed: income gets a `"+ "` prefix, everything else is shown raw
pub fn format_signed_amount(amount: &Amount) -> String {
    if amount.sanitized() > 0.0 {
        format!("+ {}", amount)
    } else {
        amount.to_string()
    }
}
