use chrono::{DateTime, Utc};

/// Converts a millisecond epoch timestamp (the service's
/// `internalDate`) to UTC wall-clock time by dropping the last three
/// decimal digits of its string form. Values shorter than four digits
/// are outside this function's domain and are not validated.
pub fn received_time(timestamp_ms: i64) -> DateTime<Utc> {
    let formatted = timestamp_ms.to_string();
    let truncated = &formatted[..formatted.len() - 3];
    let seconds = truncated.parse::<i64>().unwrap_or_else(|err| {
        log::warn!("unparseable timestamp `{truncated}`: {err}");
        0
    });

    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}
