//! Fields that require companion fields.

use serde_json::Value;

use crate::foundation::ValidationResult;
use crate::foundation::value::is_present;
use crate::validators::with_object;

/// For every present (non-null) field in `dependencies`, each of its
/// companions must be present too. Every missing companion is reported.
#[must_use]
pub fn dependency(data: &Value, dependencies: &[(String, Vec<String>)]) -> ValidationResult {
    with_object(data, |map| {
        let mut errors = Vec::new();
        let mut triggered = 0usize;
        for (field, companions) in dependencies {
            if !is_present(map, field) {
                continue;
            }
            triggered += 1;
            errors.extend(
                companions
                    .iter()
                    .filter(|companion| !is_present(map, companion))
                    .map(|companion| {
                        format!("Field '{companion}' is required when '{field}' is present")
                    }),
            );
        }
        let result = if errors.is_empty() {
            ValidationResult::pass()
        } else {
            ValidationResult::fail(errors.join("; "))
        };
        result
            .with_detail("errors", errors)
            .with_detail("triggered_fields", triggered)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn deps() -> Vec<(String, Vec<String>)> {
        vec![
            ("card".into(), vec!["cvv".into(), "expiry".into()]),
            ("ship".into(), vec!["address".into()]),
        ]
    }

    #[test]
    fn absent_fields_trigger_nothing() {
        let result = dependency(&json!({"name": "Ada"}), &deps());
        assert!(result.is_valid());
        assert_eq!(result.detail("triggered_fields"), Some(&json!(0)));
    }

    #[test]
    fn each_missing_companion_is_reported() {
        let data = json!({"card": "4111", "cvv": null, "ship": true, "address": "x"});
        let result = dependency(&data, &deps());
        assert_eq!(
            result.message(),
            Some(
                "Field 'cvv' is required when 'card' is present; \
                 Field 'expiry' is required when 'card' is present"
            )
        );
        assert_eq!(
            result.detail("errors").and_then(Value::as_array).map(Vec::len),
            Some(2)
        );
    }

    #[test]
    fn null_field_counts_as_absent() {
        assert!(dependency(&json!({"card": null}), &deps()).is_valid());
        assert!(!dependency(&json!([1]), &deps()).is_valid());
    }
}
