//! Version key generation.
//!
//! Version keys are UTC timestamps rendered with a fixed width
//! (`YYYY-MM-DDTHH:MM:SS.ffffff`), so comparing two keys as strings gives
//! the same answer as comparing the instants they encode.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::sync::Arc;

use crate::error::{VersoError, VersoResult};

/// Format of every version key and record timestamp.
pub const VERSION_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The wall clock.
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// A clock frozen at `at`.
pub fn fixed_clock(at: DateTime<Utc>) -> Clock {
    Arc::new(move || at)
}

/// Render an instant as a version key.
pub fn format_key(at: DateTime<Utc>) -> String {
    at.format(VERSION_KEY_FORMAT).to_string()
}

/// Parse a version key back into an instant.
pub fn parse_key(key: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(key, VERSION_KEY_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Choose the key for a new version of a user whose latest key is `previous`.
///
/// The result is strictly greater than `previous`, so two writes landing on
/// the same clock tick still produce two distinct versions in order.
pub fn next_key(now: DateTime<Utc>, previous: Option<&str>) -> String {
    let candidate = format_key(now);
    let Some(previous) = previous else {
        return candidate;
    };
    if candidate.as_str() > previous {
        return candidate;
    }

    match parse_key(previous) {
        Some(prev) => format_key(prev + Duration::microseconds(1)),
        None => {
            tracing::warn!(previous, "Latest version key is not in the expected format");
            candidate
        }
    }
}

/// The version key `hours` before `now`.
///
/// Fails when the window reaches past the earliest representable instant.
pub fn cutoff_key(now: DateTime<Utc>, hours: i64) -> VersoResult<String> {
    Duration::try_hours(hours)
        .and_then(|window| now.checked_sub_signed(window))
        .map(format_key)
        .ok_or_else(|| VersoError::invalid_range("hours out of range"))
}
