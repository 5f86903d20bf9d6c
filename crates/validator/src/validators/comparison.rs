//! Equality and ordering against a reference value.
//!
//! Numbers compare numerically (`1 == 1.0`) and strings lexicographically.
//! Mixed types are unequal and have no ordering.

use std::cmp::Ordering;

use serde_json::Value;

use crate::check::Bounds;
use crate::foundation::value::{compare, preview, values_equal};
use crate::foundation::{JsonType, ValidationResult};
use crate::validators::with_number;

/// Deep equality.
#[must_use]
pub fn equals(data: &Value, expected: &Value) -> ValidationResult {
    ValidationResult::check(values_equal(data, expected), || {
        format!("Value {} does not equal {}", preview(data), preview(expected))
    })
}

/// Deep inequality.
#[must_use]
pub fn not_equals(data: &Value, other: &Value) -> ValidationResult {
    ValidationResult::check(!values_equal(data, other), || {
        format!("Value must not equal {}", preview(other))
    })
}

fn ordered(
    data: &Value,
    reference: &Value,
    holds: fn(Ordering) -> bool,
    relation: &str,
) -> ValidationResult {
    match compare(data, reference) {
        Some(ordering) => ValidationResult::check(holds(ordering), || {
            format!("Value {} must be {relation} {}", preview(data), preview(reference))
        }),
        None => ValidationResult::fail(format!(
            "Cannot compare {} with {}",
            JsonType::of(data),
            JsonType::of(reference)
        )),
    }
}

/// `data > reference`.
#[must_use]
pub fn greater_than(data: &Value, reference: &Value) -> ValidationResult {
    ordered(data, reference, Ordering::is_gt, "greater than")
}

/// `data >= reference`.
#[must_use]
pub fn greater_than_or_equal(data: &Value, reference: &Value) -> ValidationResult {
    ordered(data, reference, Ordering::is_ge, "greater than or equal to")
}

/// `data < reference`.
#[must_use]
pub fn less_than(data: &Value, reference: &Value) -> ValidationResult {
    ordered(data, reference, Ordering::is_lt, "less than")
}

/// `data <= reference`.
#[must_use]
pub fn less_than_or_equal(data: &Value, reference: &Value) -> ValidationResult {
    ordered(data, reference, Ordering::is_le, "less than or equal to")
}

/// `min < data < max`, both bounds exclusive.
#[must_use]
pub fn between(data: &Value, bounds: Bounds) -> ValidationResult {
    let Bounds { min, max } = bounds;
    with_number(data, |n| {
        ValidationResult::check(n > min && n < max, || {
            format!("Value {n} must be strictly between {min} and {max}")
        })
    })
}
