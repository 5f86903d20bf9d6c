//! Text format predicates.
//!
//! Every check here requires string input; anything else is a type
//! mismatch, never coerced.

use std::sync::LazyLock;

use ::base64::Engine as _;
use regex::Regex;
use serde_json::Value;

use crate::foundation::{JsonType, ValidationResult};
use crate::validators::with_text;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

static US_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("US postal regex is valid"));

static UK_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$").expect("UK postal regex is valid")
});

static CA_POSTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z][0-9][A-Z][ -]?[0-9][A-Z][0-9]$").expect("CA postal regex is valid")
});

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

// ============================================================================
// EMAIL / URL / UUID
// ============================================================================

/// `local@domain.tld`.
#[must_use]
pub fn email(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        ValidationResult::check(EMAIL_REGEX.is_match(s), || {
            format!("'{s}' is not a valid email address")
        })
    })
}

/// An absolute http(s)/ftp(s) URL with a host.
#[must_use]
pub fn url(data: &Value) -> ValidationResult {
    with_text(data, |s| match ::url::Url::parse(s) {
        Ok(parsed) if !URL_SCHEMES.contains(&parsed.scheme()) => ValidationResult::fail(format!(
            "URL scheme '{}' is not supported (expected one of {})",
            parsed.scheme(),
            URL_SCHEMES.join(", ")
        )),
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => ValidationResult::pass()
                .with_detail("scheme", parsed.scheme())
                .with_detail("host", host),
            _ => ValidationResult::fail(format!("URL '{s}' has no host")),
        },
        Err(e) => ValidationResult::fail(format!("'{s}' is not a valid URL: {e}")),
    })
}

/// Hyphenated, simple, braced or URN UUID.
#[must_use]
pub fn uuid(data: &Value) -> ValidationResult {
    with_text(data, |s| match ::uuid::Uuid::parse_str(s) {
        Ok(id) => ValidationResult::pass().with_detail("version", id.get_version_num()),
        Err(e) => ValidationResult::fail(format!("'{s}' is not a valid UUID: {e}")),
    })
}

// ============================================================================
// PHONE / CARD / POSTAL CODE
// ============================================================================

/// Optional leading `+`, common separators, 7 to 15 digits.
#[must_use]
pub fn phone(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        let body = s.trim().strip_prefix('+').unwrap_or(s.trim());
        if let Some(bad) = body
            .chars()
            .find(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')')))
        {
            return ValidationResult::fail(format!(
                "Phone number contains invalid character '{bad}'"
            ));
        }
        let digits = body.chars().filter(char::is_ascii_digit).count();
        ValidationResult::check((7..=15).contains(&digits), || {
            format!("Phone number must have between 7 and 15 digits, found {digits}")
        })
        .with_detail("digits", digits)
    })
}

/// Card network guessed from the leading digits.
fn card_type(digits: &str) -> &'static str {
    let prefix = |n: usize| digits.get(..n).and_then(|p| p.parse::<u32>().ok()).unwrap_or(0);
    match (prefix(1), prefix(2), prefix(3), prefix(4)) {
        (4, ..) => "visa",
        (_, 34 | 37, ..) => "amex",
        (_, 51..=55, ..) | (.., 2221..=2720) => "mastercard",
        (.., 6011) | (_, 65, ..) | (_, _, 644..=649, _) => "discover",
        _ => "unknown",
    }
}

/// Luhn checksum: double every second digit from the right, sum the digit
/// sums, valid iff the total is a multiple of ten.
#[must_use]
pub fn luhn(digits: &str) -> bool {
    let mut sum = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Card number: spaces and dashes stripped, 13 to 19 digits, Luhn valid.
#[must_use]
pub fn credit_card(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        let digits: String = s.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return ValidationResult::fail("Card number must contain only digits, spaces and dashes");
        }
        if !(13..=19).contains(&digits.len()) {
            return ValidationResult::fail(format!(
                "Card number must have 13 to 19 digits, found {}",
                digits.len()
            ));
        }
        if !luhn(&digits) {
            return ValidationResult::fail("Card number failed the Luhn checksum");
        }
        ValidationResult::pass().with_detail("card_type", card_type(&digits))
    })
}

/// Postal code for `US`, `UK` (or `GB`) and `CA`.
#[must_use]
pub fn postal_code(data: &Value, country: &str) -> ValidationResult {
    let country = country.trim().to_ascii_uppercase();
    let pattern: &Regex = match country.as_str() {
        "US" | "USA" => &*US_ZIP,
        "UK" | "GB" => &*UK_POSTCODE,
        "CA" => &*CA_POSTAL,
        _ => {
            return ValidationResult::fail(format!(
                "Postal code validation is not supported for country '{country}'"
            ))
            .with_detail("supported_countries", vec!["US", "UK", "CA"]);
        }
    };
    with_text(data, |s| {
        ValidationResult::check(pattern.is_match(s.trim()), || {
            format!("'{s}' is not a valid {country} postal code")
        })
        .with_detail("country", country.as_str())
    })
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

fn char_class(data: &Value, class: &str, test: fn(char) -> bool) -> ValidationResult {
    with_text(data, |s| {
        if s.is_empty() {
            return ValidationResult::fail(format!("Value must be a non-empty {class} string"));
        }
        ValidationResult::check(s.chars().all(test), || {
            format!("'{s}' must contain only {class} characters")
        })
    })
}

/// Letters only.
#[must_use]
pub fn alpha(data: &Value) -> ValidationResult {
    char_class(data, "alphabetic", char::is_alphabetic)
}

/// Letters and digits only.
#[must_use]
pub fn alphanumeric(data: &Value) -> ValidationResult {
    char_class(data, "alphanumeric", char::is_alphanumeric)
}

/// Digits only.
#[must_use]
pub fn numeric(data: &Value) -> ValidationResult {
    char_class(data, "numeric", char::is_numeric)
}

/// Hex digits, optionally `0x`-prefixed.
#[must_use]
pub fn hex(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        ValidationResult::check(
            !body.is_empty() && body.chars().all(|c| c.is_ascii_hexdigit()),
            || format!("'{s}' is not a valid hexadecimal string"),
        )
    })
}

/// Standard alphabet base64 with padding.
#[must_use]
pub fn base64(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        if s.is_empty() {
            return ValidationResult::fail("Base64 string must not be empty");
        }
        match ::base64::engine::general_purpose::STANDARD.decode(s) {
            Ok(bytes) => ValidationResult::pass().with_detail("decoded_length", bytes.len()),
            Err(e) => ValidationResult::fail(format!("Invalid base64: {e}")),
        }
    })
}

// ============================================================================
// JSON
// ============================================================================

/// Text must parse as JSON; structured values must serialize.
#[must_use]
pub fn json(data: &Value) -> ValidationResult {
    match data {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => {
                ValidationResult::pass().with_detail("parsed_type", JsonType::of(&parsed).as_str())
            }
            Err(e) => ValidationResult::fail(format!("Invalid JSON: {e}"))
                .with_detail("line", e.line())
                .with_detail("column", e.column()),
        },
        other => match serde_json::to_string(other) {
            Ok(text) => ValidationResult::pass().with_detail("serialized_length", text.len()),
            Err(e) => ValidationResult::fail(format!("Value is not JSON serializable: {e}")),
        },
    }
}
