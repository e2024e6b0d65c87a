//! Helpers for formatting wave data for display.

use chrono::{DateTime, Utc};

/// The format used for wave timestamps, e.g. `Thu Jan 01 1970 00:16:40 UTC`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S UTC";

/// Formats a wave timestamp for display.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Returns `word` with an `s` appended unless `count` is exactly one.
pub fn pluralize(count: u64, word: &str) -> String {
    if count == 1 { word.to_string() } else { format!("{word}s") }
}
