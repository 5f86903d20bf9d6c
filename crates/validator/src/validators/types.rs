//! Type predicates.

use serde_json::Value;

use crate::foundation::{JsonType, ValidationResult};

/// Passes when `data` has type `expected`; otherwise a type-mismatch failure.
#[must_use]
pub fn is_type(data: &Value, expected: JsonType) -> ValidationResult {
    if expected.matches(data) {
        ValidationResult::pass().with_detail("type", JsonType::of(data).as_str())
    } else {
        ValidationResult::type_mismatch(expected.as_str(), data)
    }
}

/// Passes for any value except `null`.
#[must_use]
pub fn is_not_null(data: &Value) -> ValidationResult {
    ValidationResult::check(!data.is_null(), || "Value must not be null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(1), JsonType::Number, true)]
    #[case(json!(1.5), JsonType::Number, true)]
    #[case(json!(true), JsonType::Number, false)]
    #[case(json!(false), JsonType::Integer, false)]
    #[case(json!(7), JsonType::Integer, true)]
    #[case(json!(7.0), JsonType::Integer, false)]
    #[case(json!(7.0), JsonType::Float, true)]
    #[case(json!(7), JsonType::Float, false)]
    #[case(json!(true), JsonType::Float, false)]
    #[case(json!("x"), JsonType::String, true)]
    #[case(json!([]), JsonType::Array, true)]
    #[case(json!({}), JsonType::Object, true)]
    #[case(json!(null), JsonType::Null, true)]
    #[case(json!(0), JsonType::Boolean, false)]
    fn type_predicates(#[case] data: Value, #[case] expected: JsonType, #[case] valid: bool) {
        assert_eq!(is_type(&data, expected).is_valid(), valid);
    }

    #[test]
    fn mismatch_message_names_types() {
        let result = is_type(&json!(true), JsonType::Number);
        assert_eq!(result.message(), Some("Expected number, got boolean"));
    }

    #[test]
    fn not_null() {
        assert!(is_not_null(&json!(0)).is_valid());
        assert!(!is_not_null(&json!(null)).is_valid());
    }
}
