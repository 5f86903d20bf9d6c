//! The universal return value of every check.
//!
//! A [`ValidationResult`] is either a pass (no message) or a failure (always
//! carrying a message). Both may carry a details map with diagnostics that a
//! caller can surface verbatim.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::foundation::JsonType;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Outcome of one validator call.
///
/// The message is `None` exactly when the result is valid; the constructors
/// are the only way to build one, so the invariant holds for every value in
/// circulation.
///
/// # Examples
///
/// ```
/// use assay_validator::foundation::ValidationResult;
///
/// let ok = ValidationResult::pass().with_detail("length", 4);
/// assert!(ok.is_valid());
/// assert!(ok.message().is_none());
///
/// let err = ValidationResult::fail("Value is too short").with_detail("min_length", 5);
/// assert!(!err.is_valid());
/// assert_eq!(err.message(), Some("Value is too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    message: Option<String>,
    details: Map<String, Value>,
}

impl ValidationResult {
    /// A passing result with no details.
    #[must_use]
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
            details: Map::new(),
        }
    }

    /// A failing result with the given message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            details: Map::new(),
        }
    }

    /// Passes when `ok` holds, otherwise fails with the lazily built message.
    #[must_use]
    pub fn check(ok: bool, message: impl FnOnce() -> String) -> Self {
        if ok { Self::pass() } else { Self::fail(message()) }
    }

    /// A failure describing a value of the wrong JSON type.
    #[must_use]
    pub fn type_mismatch(expected: &str, actual: &Value) -> Self {
        let actual = JsonType::of(actual);
        Self::fail(format!("Expected {expected}, got {actual}"))
            .with_detail("expected_type", expected)
            .with_detail("actual_type", actual.as_str())
    }

    /// Adds one diagnostic entry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Replaces the failure message. Passing results are returned unchanged.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if !self.valid {
            self.message = Some(message.into());
        }
        self
    }

    /// Whether the value satisfied the rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The failure message, `None` for passing results.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// All diagnostic entries.
    #[must_use]
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// One diagnostic entry.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// Splits the result into `(valid, message, details)`.
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<String>, Map<String, Value>) {
        (self.valid, self.message, self.details)
    }

    /// Converts the result to its wire form.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "valid": self.valid,
            "message": self.message,
            "details": self.details,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pass_has_no_message() {
        let result = ValidationResult::pass();
        assert!(result.is_valid());
        assert_eq!(result.message(), None);
        assert!(result.details().is_empty());
    }

    #[test]
    fn message_override_only_touches_failures() {
        let ok = ValidationResult::pass().with_message("ignored");
        assert_eq!(ok.message(), None);

        let err = ValidationResult::fail("original").with_message("custom");
        assert_eq!(err.message(), Some("custom"));
    }

    #[test]
    fn type_mismatch_names_both_types() {
        let result = ValidationResult::type_mismatch("string", &json!(42));
        assert_eq!(result.message(), Some("Expected string, got integer"));
        assert_eq!(result.detail("actual_type"), Some(&json!("integer")));
    }

    #[test]
    fn wire_form() {
        let result = ValidationResult::fail("bad").with_detail("n", 1);
        assert_eq!(
            result.to_json_value(),
            json!({"valid": false, "message": "bad", "details": {"n": 1}})
        );
        assert_eq!(serde_json::to_value(&result).unwrap(), result.to_json_value());
    }
}
