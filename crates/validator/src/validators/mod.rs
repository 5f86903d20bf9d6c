//! Built-in validators
//!
//! Every validator is a plain function from the data value (plus typed
//! parameters) to a [`ValidationResult`]. None of them panic or return
//! errors for well-typed parameters; a value of the wrong JSON type is a
//! failing result that names both types.
//!
//! # Categories
//!
//! - **Types**: `is_string`, `is_integer`, ... ([`types`])
//! - **Formats**: email, URL, UUID, phone, card, postal code, encodings
//!   ([`format`], [`datetime`], [`network`], [`xml`])
//! - **Constraints**: bounds, lengths, patterns, membership ([`constraint`])
//! - **Strings**: prefix, suffix, substring, case ([`string`])
//! - **Containers**: arrays and objects ([`collection`])
//! - **Comparisons**: equality and ordering ([`comparison`])
//! - **Data quality**: completeness, consistency, uniqueness, accuracy
//!   ([`quality`])

use serde_json::{Map, Value};

use crate::foundation::ValidationResult;

pub mod collection;
pub mod comparison;
pub mod constraint;
pub mod datetime;
pub mod format;
pub mod network;
pub mod quality;
pub mod string;
pub mod types;
pub mod xml;

// ============================================================================
// INPUT SHAPE HELPERS
// ============================================================================

/// Runs `f` on string input; anything else is a type mismatch.
pub(crate) fn with_text(data: &Value, f: impl FnOnce(&str) -> ValidationResult) -> ValidationResult {
    match data {
        Value::String(s) => f(s),
        other => ValidationResult::type_mismatch("string", other),
    }
}

/// Runs `f` on array input; anything else is a type mismatch.
pub(crate) fn with_array(
    data: &Value,
    f: impl FnOnce(&[Value]) -> ValidationResult,
) -> ValidationResult {
    match data {
        Value::Array(items) => f(items),
        other => ValidationResult::type_mismatch("array", other),
    }
}

/// Runs `f` on object input; anything else is a type mismatch.
pub(crate) fn with_object(
    data: &Value,
    f: impl FnOnce(&Map<String, Value>) -> ValidationResult,
) -> ValidationResult {
    match data {
        Value::Object(map) => f(map),
        other => ValidationResult::type_mismatch("object", other),
    }
}

/// Runs `f` on numeric input; booleans and numeric strings are rejected.
pub(crate) fn with_number(data: &Value, f: impl FnOnce(f64) -> ValidationResult) -> ValidationResult {
    match crate::foundation::value::as_number(data) {
        Some(n) => f(n),
        None => ValidationResult::type_mismatch("number", data),
    }
}
