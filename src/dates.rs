//! Date formatting helpers
//!
//! Formats ISO-8601 timestamps in the fixed `dd, MM, yyyy` pattern used on
//! reports. Anything that cannot be parsed renders as [`INVALID_DATE`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Sentinel returned for unparsable input
pub const INVALID_DATE: &str = "Invalid Date";

const DATE_PATTERN: &str = "%d, %m, %Y";
const TIME_PATTERN: &str = "%H:%M";
const DATE_TIME_PATTERN: &str = "%d, %m, %Y %H:%M";
const FILE_STAMP_PATTERN: &str = "%d-%m-%Y-%H%M";

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 string into a wall-clock timestamp
///
/// Accepts RFC 3339 (with offset, kept as written), naive date-times and plain
/// dates (midnight).
pub fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn format_with(value: &str, pattern: &str) -> String {
    match parse_iso(value) {
        Some(dt) => dt.format(pattern).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Format as `dd, MM, yyyy`
pub fn format_date(value: &str) -> String {
    format_with(value, DATE_PATTERN)
}

/// Same pattern as [`format_date`]; kept separate for call sites that show
/// dates in compact lists
pub fn format_short_date(value: &str) -> String {
    format_with(value, DATE_PATTERN)
}

/// Format as `HH:mm`
pub fn format_time(value: &str) -> String {
    format_with(value, TIME_PATTERN)
}

/// Format as `dd, MM, yyyy HH:mm`
pub fn format_date_time(value: &str) -> String {
    format_with(value, DATE_TIME_PATTERN)
}

/// Format an already-parsed timestamp as `dd, MM, yyyy HH:mm`
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_PATTERN).to_string()
}

/// Suggested output file name: `<product>-admin-report-<dd-MM-yyyy-HHmm>.pdf`
pub fn report_file_name(product: &str, generated_at: &NaiveDateTime) -> String {
    format!(
        "{}-admin-report-{}.pdf",
        product,
        generated_at.format(FILE_STAMP_PATTERN)
    )
}
