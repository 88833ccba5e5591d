//! Date/time utilities for hotfeed.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// RFC 822 layout with a zero-padded day of month.
const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Naive formats tried after RFC 3339 and RFC 2822. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse an upstream-provided date string.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`
/// and a bare `YYYY-MM-DD`. Returns `None` when nothing matches.
pub fn parse_entry_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Render a timestamp as RFC 822, e.g. `Wed, 04 Jan 2023 00:00:00 +0000`.
pub fn to_rfc822<Z: TimeZone>(dt: &DateTime<Z>) -> String
where
    Z::Offset: Display,
{
    dt.format(RFC822_FORMAT).to_string()
}

/// Render an upstream date string in RFC 822 form.
///
/// Falls back to `now` when `date` is absent or unparseable.
pub fn format_rfc822(date: Option<&str>, now: DateTime<Utc>) -> String {
    match date.and_then(parse_entry_date) {
        Some(dt) => to_rfc822(&dt),
        None => to_rfc822(&now),
    }
}

/// Format a DateTime<Utc> as `%Y-%m-%d %H:%M:%S` in the given timezone.
///
/// Unknown timezone names fall back to UTC.
pub fn format_local(dt: &DateTime<Utc>, timezone: &str) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    match timezone.parse::<Tz>() {
        Ok(tz) => dt.with_timezone(&tz).format(FORMAT).to_string(),
        Err(_) => dt.format(FORMAT).to_string(),
    }
}
