//! Date/time utilities for Agora.

use chrono::NaiveDateTime;

/// Format used for timestamps in broadcast events.
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a stored timestamp for broadcast events.
///
/// Timestamps are stored by SQLite as `YYYY-MM-DD HH:MM:SS` (UTC); events
/// carry the minute-resolution `YYYY-MM-DD HH:MM` form. Returns the input
/// unchanged if it does not parse.
pub fn format_event_timestamp(datetime_str: &str) -> String {
    match NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S") {
        Ok(naive) => naive.format(EVENT_TIMESTAMP_FORMAT).to_string(),
        Err(_) => datetime_str.to_string(),
    }
}
