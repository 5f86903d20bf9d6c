//! Presence, bound, length, pattern and membership constraints.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::check::{Bounds, LengthBounds};
use crate::config::EngineConfig;
use crate::foundation::value::{length_of, preview, values_equal};
use crate::foundation::{JsonType, ValidationResult};
use crate::validators::{with_number, with_text};

// ============================================================================
// PRESENCE
// ============================================================================

/// Present and not null. Empty strings, arrays and objects also fail.
#[must_use]
pub fn required(data: &Value) -> ValidationResult {
    let empty = match data {
        Value::Null => return ValidationResult::fail("Value is required"),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    };
    ValidationResult::check(!empty, || {
        format!("Value is required but the {} is empty", JsonType::of(data))
    })
}

/// Not null, not blank text and not an empty container.
#[must_use]
pub fn not_empty(data: &Value) -> ValidationResult {
    let empty = match data {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    };
    ValidationResult::check(!empty, || "Value must not be empty".to_string())
}

// ============================================================================
// NUMERIC BOUNDS
// ============================================================================

/// `data >= min`.
#[must_use]
pub fn min_value(data: &Value, min: f64) -> ValidationResult {
    with_number(data, |n| {
        ValidationResult::check(n >= min, || format!("Value {n} must be at least {min}"))
            .with_detail("min_value", min)
    })
}

/// `data <= max`.
#[must_use]
pub fn max_value(data: &Value, max: f64) -> ValidationResult {
    with_number(data, |n| {
        ValidationResult::check(n <= max, || format!("Value {n} must be at most {max}"))
            .with_detail("max_value", max)
    })
}

/// `min <= data <= max`.
#[must_use]
pub fn range(data: &Value, bounds: Bounds) -> ValidationResult {
    let Bounds { min, max } = bounds;
    with_number(data, |n| {
        ValidationResult::check((min..=max).contains(&n), || {
            format!("Value {n} must be between {min} and {max}")
        })
        .with_detail("min_value", min)
        .with_detail("max_value", max)
    })
}

// ============================================================================
// LENGTH
// ============================================================================

fn with_length(data: &Value, f: impl FnOnce(usize) -> ValidationResult) -> ValidationResult {
    match length_of(data) {
        Some(len) => f(len).with_detail("length", len),
        None => ValidationResult::fail(format!("Value of type {} has no length", JsonType::of(data)))
            .with_detail("actual_type", JsonType::of(data).as_str()),
    }
}

/// Length is at least `min`.
#[must_use]
pub fn min_length(data: &Value, min: usize) -> ValidationResult {
    with_length(data, |len| {
        ValidationResult::check(len >= min, || {
            format!("Length {len} is shorter than the minimum of {min}")
        })
    })
}

/// Length is at most `max`.
#[must_use]
pub fn max_length(data: &Value, max: usize) -> ValidationResult {
    with_length(data, |len| {
        ValidationResult::check(len <= max, || {
            format!("Length {len} is longer than the maximum of {max}")
        })
    })
}

/// Length within whichever bounds are set.
#[must_use]
pub fn length(data: &Value, bounds: LengthBounds) -> ValidationResult {
    with_length(data, |len| match bounds {
        LengthBounds { min: Some(min), .. } if len < min => {
            ValidationResult::fail(format!("Length {len} is shorter than the minimum of {min}"))
        }
        LengthBounds { max: Some(max), .. } if len > max => {
            ValidationResult::fail(format!("Length {len} is longer than the maximum of {max}"))
        }
        _ => ValidationResult::pass(),
    })
}

/// Length is exactly `expected`.
#[must_use]
pub fn exact_length(data: &Value, expected: usize) -> ValidationResult {
    with_length(data, |len| {
        ValidationResult::check(len == expected, || {
            format!("Length {len} must be exactly {expected}")
        })
    })
}

// ============================================================================
// PATTERN
// ============================================================================

/// A caller-supplied regex, compiled once under the engine limits.
///
/// A pattern that is too long or fails to compile is kept with the reason,
/// so every evaluation reports the same failing result instead of an error.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Result<Regex, String>,
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl CompiledPattern {
    /// Compiles `source`, bounded by `max_pattern_length` and
    /// `regex_size_limit`.
    #[must_use]
    pub fn new(source: impl Into<String>, limits: &EngineConfig) -> Self {
        let source = source.into();
        let regex = if source.len() > limits.max_pattern_length {
            Err(format!(
                "Pattern is {} bytes long, the limit is {}",
                source.len(),
                limits.max_pattern_length
            ))
        } else {
            RegexBuilder::new(&source)
                .size_limit(limits.regex_size_limit)
                .build()
                .map_err(|e| format!("Invalid regex pattern: {e}"))
        };
        Self { source, regex }
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled regex, or why there is none.
    pub fn regex(&self) -> Result<&Regex, &str> {
        self.regex.as_ref().map_err(String::as_str)
    }
}

/// Regex search anywhere in the text.
///
/// The scanned input length is bounded by `max_pattern_input_length`. A
/// pattern that did not compile is a failing result, not an error.
#[must_use]
pub fn pattern(data: &Value, pattern: &CompiledPattern, limits: &EngineConfig) -> ValidationResult {
    let regex = match pattern.regex() {
        Ok(regex) => regex,
        Err(reason) => {
            return ValidationResult::fail(reason).with_detail("pattern", pattern.as_str());
        }
    };
    with_text(data, |s| {
        if s.len() > limits.max_pattern_input_length {
            return ValidationResult::fail(format!(
                "Input is {} bytes long, the pattern input limit is {}",
                s.len(),
                limits.max_pattern_input_length
            ));
        }
        ValidationResult::check(regex.is_match(s), || {
            format!("'{s}' does not match pattern '{}'", pattern.as_str())
        })
        .with_detail("pattern", pattern.as_str())
    })
}

// ============================================================================
// MEMBERSHIP
// ============================================================================

/// Equal to one of `allowed`.
#[must_use]
pub fn one_of(data: &Value, allowed: &[Value]) -> ValidationResult {
    ValidationResult::check(allowed.iter().any(|v| values_equal(data, v)), || {
        format!(
            "Value {} is not one of the allowed values {}",
            preview(data),
            preview(&Value::Array(allowed.to_vec()))
        )
    })
}

/// Equal to none of `forbidden`.
#[must_use]
pub fn not_in(data: &Value, forbidden: &[Value]) -> ValidationResult {
    ValidationResult::check(!forbidden.iter().any(|v| values_equal(data, v)), || {
        format!("Value {} is forbidden", preview(data))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(""), false)]
    #[case(json!([]), false)]
    #[case(json!({}), false)]
    #[case(json!(0), true)]
    #[case(json!(false), true)]
    #[case(json!(" "), true)]
    fn required_values(#[case] data: Value, #[case] valid: bool) {
        assert_eq!(required(&data).is_valid(), valid);
    }

    #[test]
    fn not_empty_trims_text() {
        assert!(!not_empty(&json!("   ")).is_valid());
        assert!(not_empty(&json!("x")).is_valid());
        assert!(not_empty(&json!(0)).is_valid());
    }

    #[test]
    fn range_names_both_bounds() {
        let bounds = Bounds { min: 1.0, max: 10.0 };
        assert!(range(&json!(5), bounds).is_valid());
        assert!(range(&json!(1), bounds).is_valid());
        assert!(range(&json!(10), bounds).is_valid());

        let result = range(&json!(15), bounds);
        assert!(!result.is_valid());
        let message = result.message().unwrap();
        assert!(message.contains('1') && message.contains("10"), "{message}");
    }

    #[test]
    fn bounds_reject_booleans_and_text() {
        assert_eq!(
            min_value(&json!(true), 0.0).message(),
            Some("Expected number, got boolean")
        );
        assert!(!max_value(&json!("5"), 10.0).is_valid());
    }

    #[test]
    fn lengths_count_characters() {
        assert!(min_length(&json!("héllo"), 5).is_valid());
        assert!(max_length(&json!("héllo"), 5).is_valid());
        assert!(exact_length(&json!([1, 2, 3]), 3).is_valid());
        assert!(min_length(&json!({"a": 1}), 1).is_valid());
        assert_eq!(min_length(&json!("ab"), 3).detail("length"), Some(&json!(2)));
    }

    #[test]
    fn absence_of_length_is_a_failure() {
        let result = min_length(&json!(42), 1);
        assert!(!result.is_valid());
        assert_eq!(result.message(), Some("Value of type integer has no length"));
    }

    #[test]
    fn length_with_one_bound() {
        let at_most_two = LengthBounds { min: None, max: Some(2) };
        assert!(length(&json!("ab"), at_most_two).is_valid());
        assert!(!length(&json!("abc"), at_most_two).is_valid());
        let at_least_two = LengthBounds { min: Some(2), max: None };
        assert!(!length(&json!("a"), at_least_two).is_valid());
    }

    fn compiled(source: &str, limits: &EngineConfig) -> CompiledPattern {
        CompiledPattern::new(source, limits)
    }

    #[test]
    fn pattern_searches_anywhere() {
        let limits = EngineConfig::default();
        assert!(pattern(&json!("order-1234"), &compiled(r"\d{4}", &limits), &limits).is_valid());
        assert!(!pattern(&json!("order-12"), &compiled(r"^\d+$", &limits), &limits).is_valid());
    }

    #[test]
    fn bad_patterns_are_failures() {
        let limits = EngineConfig::default();
        let bad = compiled("(unclosed", &limits);
        assert!(bad.regex().is_err());
        let result = pattern(&json!("abc"), &bad, &limits);
        assert!(!result.is_valid());
        assert!(result.message().unwrap().starts_with("Invalid regex pattern"));
        assert_eq!(result.detail("pattern"), Some(&json!("(unclosed")));
    }

    #[test]
    fn pattern_limits_are_enforced() {
        let limits = EngineConfig::default()
            .with_max_pattern_length(4)
            .with_max_pattern_input_length(8);
        let too_long = compiled("abcdef", &limits);
        assert_eq!(too_long.regex().err(), Some("Pattern is 6 bytes long, the limit is 4"));
        assert!(!pattern(&json!("abc"), &too_long, &limits).is_valid());
        assert!(!pattern(&json!("abcdefghijk"), &compiled("a", &limits), &limits).is_valid());
        assert!(pattern(&json!("abc"), &compiled("a", &limits), &limits).is_valid());
    }

    #[test]
    fn compiled_patterns_compare_by_source() {
        let limits = EngineConfig::default();
        assert_eq!(compiled("^a", &limits), compiled("^a", &limits));
        assert_ne!(compiled("^a", &limits), compiled("^b", &limits));
    }

    #[test]
    fn membership_normalizes_numbers() {
        assert!(one_of(&json!(1.0), &[json!(1), json!(2)]).is_valid());
        assert!(!one_of(&json!("3"), &[json!(1), json!(2)]).is_valid());
        assert!(not_in(&json!("guest"), &[json!("root"), json!("admin")]).is_valid());
        assert!(!not_in(&json!("root"), &[json!("root")]).is_valid());
    }
}
