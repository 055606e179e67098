//! Date coercion for sorting date columns.
//!
//! Every parser produces milliseconds since the Unix epoch (UTC), so keys from
//! a declared format and keys from the native fallback compare on one scale.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::column::DateFormat;

/// Converts cell text into a sortable date key
pub trait DateParser {
    /// Milliseconds since the Unix epoch, or `None` when the text is not a date
    fn sort_key(&self, content: &str, format: Option<&DateFormat>) -> Option<i64>;
}

/// Date parser backed by `chrono`.
///
/// Tries the declared format first and falls back to native parsing of
/// common layouts when the declared format does not match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoDateParser;

const NATIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const NATIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a %b %d %Y",
];

impl DateParser for ChronoDateParser {
    fn sort_key(&self, content: &str, format: Option<&DateFormat>) -> Option<i64> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        format
            .and_then(|f| parse_with_format(content, f))
            .or_else(|| parse_native(content))
    }
}

fn parse_with_format(content: &str, format: &DateFormat) -> Option<i64> {
    match format {
        DateFormat::Iso8601 => DateTime::parse_from_rfc3339(content)
            .ok()
            .map(|dt| dt.timestamp_millis())
            .or_else(|| parse_datetime(content, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|| parse_datetime(content, "%Y-%m-%dT%H:%M"))
            .or_else(|| parse_date(content, "%Y-%m-%d")),
        DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(content)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        DateFormat::Mysql => parse_datetime(content, "%Y-%m-%d %H:%M:%S")
            .or_else(|| parse_date(content, "%Y-%m-%d")),
        DateFormat::Unix => content.parse::<i64>().ok(),
        DateFormat::Custom(pattern) => {
            let pattern = moment_to_strftime(pattern);
            parse_datetime(content, &pattern).or_else(|| parse_date(content, &pattern))
        }
    }
}

/// Chronological parsing of common layouts
fn parse_native(content: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(content) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(content) {
        return Some(dt.timestamp_millis());
    }

    NATIVE_DATETIME_FORMATS
        .iter()
        .find_map(|f| parse_datetime(content, f))
        .or_else(|| NATIVE_DATE_FORMATS.iter().find_map(|f| parse_date(content, f)))
}

fn parse_datetime(content: &str, pattern: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(content, pattern)
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn parse_date(content: &str, pattern: &str) -> Option<i64> {
    NaiveDate::parse_from_str(content, pattern)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Format tokens, longest first so `YYYY` wins over `YY`
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%m"),
    ("DDDD", "%j"),
    ("DD", "%d"),
    ("D", "%d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%H"),
    ("hh", "%I"),
    ("h", "%I"),
    ("mm", "%M"),
    ("m", "%M"),
    ("ss", "%S"),
    ("s", "%S"),
    ("SSS", "%3f"),
    ("A", "%p"),
    ("a", "%p"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
    ("X", "%s"),
];

/// Translate a `YYYY-MM-DD` style format string into a strftime pattern.
///
/// Text inside `[...]` is copied literally.
pub fn moment_to_strftime(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        for (token, spec) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }

        push_literal(&mut out, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}
