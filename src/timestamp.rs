use chrono::{DateTime, Utc};

const PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Render epoch milliseconds as `YYYY-MM-DDTHH:mm:ss.sssZ` in UTC.
///
/// Never fails: instants outside the representable calendar range are
/// clamped to its nearest bound.
pub fn format_timestamp(timestamp_millis: i64) -> String {
    let instant = DateTime::<Utc>::from_timestamp_millis(timestamp_millis).unwrap_or(
        if timestamp_millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        },
    );
    instant.format(PATTERN).to_string()
}
