use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Whole days elapsed between `since` and `now`.
///
/// Timestamps in the future count as zero days.
pub fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(since).num_days().max(0)
}

/// Parse a persisted timestamp.
///
/// Accepts RFC 3339 as well as naive ISO-8601 date-times (with `T` or a space
/// between date and time) and bare dates. Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}
