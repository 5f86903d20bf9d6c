//! Date, time and datetime predicates.
//!
//! Without an explicit format each predicate tries a fixed list of common
//! layouts in order and reports the first that matches. The order matters:
//! `01/02/2024` is read month-first before day-first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::foundation::ValidationResult;
use crate::validators::with_text;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

const TIME_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const RFC3339: &str = "rfc3339";

fn matched(format: &str) -> ValidationResult {
    ValidationResult::pass().with_detail("matched_format", format)
}

fn first_match(
    s: &str,
    formats: &[&'static str],
    parses: impl Fn(&str, &str) -> bool,
) -> Option<&'static str> {
    formats.iter().copied().find(|format| parses(s, format))
}

/// Calendar date.
#[must_use]
pub fn date(data: &Value, format: Option<&str>) -> ValidationResult {
    let parses = |s: &str, f: &str| NaiveDate::parse_from_str(s, f).is_ok();
    with_text(data, |s| match format {
        Some(format) => ValidationResult::check(parses(s, format), || {
            format!("'{s}' does not match date format '{format}'")
        })
        .with_detail("format", format),
        None => match first_match(s, &DATE_FORMATS, parses) {
            Some(format) => matched(format),
            None => ValidationResult::fail(format!("'{s}' is not a recognized date"))
                .with_detail("tried_formats", DATE_FORMATS.to_vec()),
        },
    })
}

/// Time of day, 24-hour or 12-hour with AM/PM.
#[must_use]
pub fn time(data: &Value, format: Option<&str>) -> ValidationResult {
    let parses = |s: &str, f: &str| NaiveTime::parse_from_str(s, f).is_ok();
    with_text(data, |s| match format {
        Some(format) => ValidationResult::check(parses(s, format), || {
            format!("'{s}' does not match time format '{format}'")
        })
        .with_detail("format", format),
        None => match first_match(s, &TIME_FORMATS, parses) {
            Some(format) => matched(format),
            None => ValidationResult::fail(format!("'{s}' is not a recognized time"))
                .with_detail("tried_formats", TIME_FORMATS.to_vec()),
        },
    })
}

/// Date and time. An explicit format may include an offset (`%z`).
#[must_use]
pub fn datetime(data: &Value, format: Option<&str>) -> ValidationResult {
    let parses = |s: &str, f: &str| NaiveDateTime::parse_from_str(s, f).is_ok();
    with_text(data, |s| match format {
        Some(format) => {
            let ok = parses(s, format) || DateTime::parse_from_str(s, format).is_ok();
            ValidationResult::check(ok, || {
                format!("'{s}' does not match datetime format '{format}'")
            })
            .with_detail("format", format)
        }
        None if DateTime::parse_from_rfc3339(s).is_ok() => matched(RFC3339),
        None => match first_match(s, &DATETIME_FORMATS, parses) {
            Some(format) => matched(format),
            None => {
                let mut tried = vec![RFC3339];
                tried.extend(DATETIME_FORMATS);
                ValidationResult::fail(format!("'{s}' is not a recognized datetime"))
                    .with_detail("tried_formats", tried)
            }
        },
    })
}
