// Display helpers shared by the views
//
// Timestamps are rendered in UTC so output does not depend on the host zone.

use crate::constant::NOT_AVAILABLE;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn render(value: Option<&str>, pattern: &str) -> String {
    value
        .and_then(parse_timestamp)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// "Jan 15, 2024, 10:00 AM"
pub fn format_date(value: Option<&str>) -> String {
    render(value, "%b %-d, %Y, %I:%M %p")
}

/// "January 15, 2024"
pub fn format_date_long(value: Option<&str>) -> String {
    render(value, "%B %-d, %Y")
}

/// "Jan 15, 2024"
pub fn format_date_short(value: Option<&str>) -> String {
    render(value, "%b %-d, %Y")
}

/// Fixed 6+4 shortening used in the wallet header.
pub fn format_wallet_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase()
}

/// Style class for a consent, record or transaction status. Unknown statuses get none.
pub fn status_class(status: &str) -> Option<&'static str> {
    match normalize(status).as_str() {
        "pending" => Some("pending"),
        "active" => Some("active"),
        "approved" => Some("approved"),
        "revoked" => Some("revoked"),
        "rejected" => Some("rejected"),
        "expired" => Some("expired"),
        "confirmed" => Some("confirmed"),
        "failed" => Some("failed"),
        "completed" => Some("completed"),
        _ => None,
    }
}

pub fn transaction_type_class(tx_type: Option<&str>) -> String {
    let Some(tx_type) = tx_type else {
        return String::new();
    };
    let normalized = normalize(tx_type);
    if normalized.contains("consent") {
        "consent_approval".to_string()
    } else if normalized.contains("data") || normalized.contains("access") {
        "data_access".to_string()
    } else {
        normalized
    }
}

pub fn record_type_class(record_type: Option<&str>) -> Option<&'static str> {
    let normalized = normalize(record_type?);
    if normalized.contains("diagnostic") || normalized.contains("diagnosis") {
        Some("diagnostic")
    } else if normalized.contains("treatment") || normalized.contains("procedure") {
        Some("treatment")
    } else if normalized.contains("lab") || normalized.contains("test") {
        Some("lab")
    } else {
        None
    }
}

pub fn confirmation_glyph(confirmed: bool) -> &'static str {
    if confirmed {
        "✓"
    } else {
        "○"
    }
}
