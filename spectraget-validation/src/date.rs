// Date conversion for the `date` type and the `dateRange` directive

use crate::coerce::to_text;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Largest representable distance from the epoch, in milliseconds
const MAX_TIME_MS: f64 = 8.64e15;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Milliseconds since the Unix epoch for a payload value, or `None` when
/// the value is not a valid date.
///
/// Numbers are taken as epoch milliseconds, `null` is the epoch itself and
/// booleans are 0 or 1 ms. Arrays and objects go through their text form.
pub fn timestamp_millis(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().and_then(time_clip),
        Value::String(s) => parse_date(s),
        Value::Array(_) | Value::Object(_) => parse_date(&to_text(value)),
    }
}

/// Parse a date string into epoch milliseconds.
///
/// Zone-less forms are read as UTC.
pub fn parse_date(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    parse_with_offset(text)
        .or_else(|| parse_date_string(text))
        .or_else(|| parse_naive(text))
        .or_else(|| parse_partial_iso(text))
        .map(|ms| ms as f64)
        .and_then(time_clip)
}

fn parse_with_offset(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }

    let normalized = match text.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(head) => format!("{}+00:00", head),
        None => text.to_string(),
    };
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
        .map(|dt| dt.timestamp_millis())
}

/// `Mon Jan 15 2024` and `Mon Jan 15 2024 10:30:00 GMT+0000 (Zone Name)`,
/// the shapes a JavaScript `Date` prints itself in. The weekday and the
/// zone name are ignored.
fn parse_date_string(text: &str) -> Option<i64> {
    let (weekday, rest) = text.split_once(' ')?;
    if weekday.len() != 3 || !weekday.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let rest = match rest.rfind(" (") {
        Some(idx) if rest.ends_with(')') => &rest[..idx],
        _ => rest,
    };

    if let Ok(dt) = DateTime::parse_from_str(rest, "%b %d %Y %H:%M:%S GMT%z") {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(rest, "%b %d %Y %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(rest, "%b %d %Y")
        .ok()
        .and_then(midnight_utc)
}

fn parse_naive(text: &str) -> Option<i64> {
    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.and_utc().timestamp_millis());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(midnight_utc)
}

/// `YYYY` and `YYYY-MM`
fn parse_partial_iso(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let year_only = bytes.len() == 4 && bytes.iter().all(u8::is_ascii_digit);
    let year_month = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit);

    let full = if year_only {
        format!("{}-01-01", text)
    } else if year_month {
        format!("{}-01", text)
    } else {
        return None;
    };

    NaiveDate::parse_from_str(&full, "%Y-%m-%d")
        .ok()
        .and_then(midnight_utc)
}

fn midnight_utc(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn time_clip(ms: f64) -> Option<f64> {
    if ms.is_finite() && ms.abs() <= MAX_TIME_MS {
        Some(ms.trunc() + 0.0)
    } else {
        None
    }
}
