//! Data-quality measures: completeness, consistency, uniqueness, accuracy.
//!
//! Unlike the other predicates these report measurements in their details
//! whether or not the check passes, so callers can chart them.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::foundation::ValidationResult;
use crate::foundation::value::{
    as_number, canonical_key, compare, is_present, number_value, values_equal,
};
use crate::validators::{with_array, with_object};

// ============================================================================
// COMPLETENESS
// ============================================================================

/// Share of `required_fields` present (non-null) must reach `threshold`.
/// With no required fields the ratio is 1.
#[must_use]
pub fn completeness(data: &Value, required_fields: &[String], threshold: f64) -> ValidationResult {
    with_object(data, |map| {
        let missing: Vec<&str> = required_fields
            .iter()
            .map(String::as_str)
            .filter(|field| !is_present(map, field))
            .collect();
        let required = required_fields.len();
        let present = required - missing.len();
        #[allow(clippy::cast_precision_loss)]
        let ratio = if required == 0 {
            1.0
        } else {
            present as f64 / required as f64
        };

        ValidationResult::check(ratio >= threshold, || {
            format!("Completeness {ratio:.2} is below the threshold of {threshold}")
        })
        .with_detail("completeness_ratio", number_value(ratio))
        .with_detail("missing_fields", missing)
        .with_detail("present_count", present)
        .with_detail("required_count", required)
        .with_detail("threshold", number_value(threshold))
    })
}

// ============================================================================
// CONSISTENCY
// ============================================================================

/// A relation that must hold between two fields of the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyRule {
    /// Left-hand field.
    pub left: String,
    /// Right-hand field.
    pub right: String,
    /// `equals`, `not_equals`, `greater_than`, `less_than`,
    /// `greater_than_or_equal` or `less_than_or_equal`. Anything else is
    /// reported when the rule is checked.
    pub relation: String,
}

impl ConsistencyRule {
    /// Reads `{"fields": [left, right], "relation": ...}`; the relation
    /// defaults to `equals`.
    pub fn parse(raw: &Value) -> Result<Self, String> {
        let Value::Object(map) = raw else {
            return Err(format!("consistency rule must be an object, got {raw}"));
        };
        let fields = match map.get("fields") {
            Some(Value::Array(fields)) => fields,
            _ => return Err("consistency rule needs a 'fields' list".to_string()),
        };
        let names: Vec<&str> = fields.iter().filter_map(Value::as_str).collect();
        let [left, right] = names.as_slice() else {
            return Err(format!(
                "consistency rule needs exactly two field names, got {}",
                Value::Array(fields.clone())
            ));
        };
        let relation = match map.get("relation") {
            None | Some(Value::Null) => "equals".to_string(),
            Some(Value::String(r)) => r.clone(),
            Some(other) => return Err(format!("relation must be a string, got {other}")),
        };
        Ok(Self {
            left: (*left).to_string(),
            right: (*right).to_string(),
            relation,
        })
    }

    /// `Some(true|false)` for a known relation, `None` otherwise. Ordering
    /// relations on incomparable values are `false`.
    fn holds(&self, left: &Value, right: &Value) -> Option<bool> {
        let ordering = compare(left, right);
        let holds = match self.relation.as_str() {
            "equals" => values_equal(left, right),
            "not_equals" => !values_equal(left, right),
            "greater_than" => ordering.is_some_and(std::cmp::Ordering::is_gt),
            "greater_than_or_equal" => ordering.is_some_and(std::cmp::Ordering::is_ge),
            "less_than" => ordering.is_some_and(std::cmp::Ordering::is_lt),
            "less_than_or_equal" => ordering.is_some_and(std::cmp::Ordering::is_le),
            _ => return None,
        };
        Some(holds)
    }
}

/// Every rule whose two fields are present must hold.
#[must_use]
pub fn consistency(data: &Value, rules: &[ConsistencyRule]) -> ValidationResult {
    with_object(data, |map| {
        let mut errors = Vec::new();
        let mut checked = 0usize;
        for rule in rules {
            let (Some(left), Some(right)) = (present(map, &rule.left), present(map, &rule.right))
            else {
                continue;
            };
            checked += 1;
            match rule.holds(left, right) {
                Some(true) => {}
                Some(false) => errors.push(format!(
                    "Fields '{}' and '{}' violate relation {}",
                    rule.left, rule.right, rule.relation
                )),
                None => errors.push(format!(
                    "Unknown relation '{}' for fields '{}' and '{}'",
                    rule.relation, rule.left, rule.right
                )),
            }
        }
        let result = if errors.is_empty() {
            ValidationResult::pass()
        } else {
            ValidationResult::fail(errors.join("; "))
        };
        result
            .with_detail("errors", errors)
            .with_detail("rules_checked", checked)
    })
}

fn present<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    map.get(field).filter(|v| !v.is_null())
}

// ============================================================================
// UNIQUENESS
// ============================================================================

/// No two items (or no two `key_field` values) are deeply equal. Items
/// without the key are left out of the count.
#[must_use]
pub fn uniqueness(data: &Value, key_field: Option<&str>) -> ValidationResult {
    with_array(data, |items| {
        let keyed: Vec<&Value> = match key_field {
            Some(key) => items.iter().filter_map(|item| item.get(key)).collect(),
            None => items.iter().collect(),
        };
        let skipped = items.len() - keyed.len();

        let mut counts: HashMap<String, (usize, &Value)> = HashMap::new();
        let mut order = Vec::new();
        for value in keyed.iter().copied() {
            let key = canonical_key(value);
            let entry = counts.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (0, value)
            });
            entry.0 += 1;
        }
        let duplicates: Vec<Value> = order
            .iter()
            .filter_map(|key| counts.get(key))
            .filter(|(count, _)| *count > 1)
            .map(|(_, value)| (*value).clone())
            .collect();

        let total = keyed.len();
        let unique = counts.len();
        let duplicate_count = total - unique;
        let mut result = ValidationResult::check(duplicate_count == 0, || match key_field {
            Some(key) => format!("Found {duplicate_count} duplicate value(s) of '{key}'"),
            None => format!("Found {duplicate_count} duplicate item(s)"),
        })
        .with_detail("total_count", total)
        .with_detail("unique_count", unique)
        .with_detail("duplicate_count", duplicate_count)
        .with_detail("duplicates", duplicates);
        if key_field.is_some() {
            result = result.with_detail("missing_key_count", skipped);
        }
        result
    })
}

// ============================================================================
// ACCURACY
// ============================================================================

/// Numbers must be within `tolerance` of `reference`; other values must
/// equal it exactly.
#[must_use]
pub fn accuracy(data: &Value, reference: &Value, tolerance: f64) -> ValidationResult {
    let (Some(actual), Some(expected)) = (as_number(data), as_number(reference)) else {
        let exact = values_equal(data, reference);
        return ValidationResult::check(exact, || {
            "Value does not match the reference value".to_string()
        })
        .with_detail("exact_match", exact);
    };

    let difference = (actual - expected).abs();
    let percent_error = if expected == 0.0 {
        if difference == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        difference / expected.abs() * 100.0
    };
    ValidationResult::check(difference <= tolerance, || {
        format!(
            "Value {actual} differs from reference {expected} by {difference}, \
             tolerance is {tolerance}"
        )
    })
    .with_detail("difference", number_value(difference))
    .with_detail("percent_error", number_value(percent_error))
    .with_detail("tolerance", number_value(tolerance))
    .with_detail("reference", reference.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn completeness_ratio() {
        let data = json!({"a": 1, "b": 2, "c": null});
        let result = completeness(&data, &fields(&["a", "b", "c"]), 1.0);
        assert!(!result.is_valid());
        let ratio = result.detail("completeness_ratio").and_then(Value::as_f64).unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.detail("missing_fields"), Some(&json!(["c"])));

        assert!(completeness(&data, &fields(&["a", "b", "c"]), 0.5).is_valid());
    }

    #[test]
    fn completeness_with_no_fields_is_full() {
        let result = completeness(&json!({}), &[], 1.0);
        assert!(result.is_valid());
        assert_eq!(result.detail("completeness_ratio"), Some(&json!(1.0)));
    }

    #[test]
    fn consistency_rules_parse() {
        let raw = json!({"fields": ["start", "end"], "relation": "less_than"});
        let rule = ConsistencyRule::parse(&raw).unwrap();
        assert_eq!(rule.left, "start");
        assert_eq!(rule.relation, "less_than");
        assert!(ConsistencyRule::parse(&json!({"fields": ["only"]})).is_err());
        assert!(ConsistencyRule::parse(&json!("start < end")).is_err());
    }

    #[test]
    fn consistency_reports_each_violation() {
        let rules: Vec<ConsistencyRule> = [
            json!({"fields": ["start", "end"], "relation": "less_than"}),
            json!({"fields": ["a", "b"]}),
            json!({"fields": ["a", "b"], "relation": "resembles"}),
            json!({"fields": ["a", "missing"]}),
        ]
        .iter()
        .map(|raw| ConsistencyRule::parse(raw).unwrap())
        .collect();
        let result = consistency(&json!({"start": 5, "end": 3, "a": 1, "b": 1.0}), &rules);
        assert!(!result.is_valid());
        let errors = result.detail("errors").and_then(Value::as_array).unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(result.detail("rules_checked"), Some(&json!(3)));
    }

    #[test]
    fn uniqueness_by_key() {
        let data = json!([{"id": 1}, {"id": 2}, {"id": 1}, {"name": "x"}]);
        let result = uniqueness(&data, Some("id"));
        assert!(!result.is_valid());
        assert_eq!(result.detail("duplicate_count"), Some(&json!(1)));
        assert_eq!(result.detail("duplicates"), Some(&json!([1])));
        assert_eq!(result.detail("missing_key_count"), Some(&json!(1)));
    }

    #[test]
    fn uniqueness_is_structural() {
        let result = uniqueness(&json!([{"a": [1, 2]}, {"a": [1.0, 2]}]), None);
        assert_eq!(result.detail("duplicate_count"), Some(&json!(1)));
        assert!(uniqueness(&json!([]), None).is_valid());
    }

    #[test]
    fn accuracy_within_tolerance() {
        let result = accuracy(&json!(10.5), &json!(10), 1.0);
        assert!(result.is_valid());
        assert_eq!(result.detail("difference"), Some(&json!(0.5)));
        assert_eq!(result.detail("percent_error"), Some(&json!(5.0)));
        assert!(!accuracy(&json!(12), &json!(10), 1.0).is_valid());
    }

    #[test]
    fn accuracy_against_zero() {
        let result = accuracy(&json!(1), &json!(0), 5.0);
        assert_eq!(result.detail("percent_error"), Some(&json!("inf")));
        let result = accuracy(&json!(0), &json!(0), 0.0);
        assert!(result.is_valid());
        assert_eq!(result.detail("percent_error"), Some(&json!(0.0)));
    }

    #[test]
    fn accuracy_of_non_numbers_is_exact() {
        assert!(accuracy(&json!("abc"), &json!("abc"), 0.0).is_valid());
        assert!(!accuracy(&json!("abc"), &json!("abd"), 10.0).is_valid());
    }
}
