//! Helpers over `serde_json::Value` used across the catalog.

use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

/// Longest rendering of a value embedded in a message.
const PREVIEW_LIMIT: usize = 64;

/// Numeric view of a value. Booleans and numeric strings are not numbers.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Equality with numeric normalization: `1 == 1.0`, recursively through
/// arrays and objects. Integers compare exactly at any magnitude.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

/// Ordering between two values: numbers numerically, strings
/// lexicographically. Anything else has no ordering.
#[must_use]
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// A JSON number split into exact integers and floats.
#[derive(Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

fn numeric(n: &Number) -> Numeric {
    if let Some(i) = n.as_i64() {
        Numeric::Int(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        Numeric::Int(i128::from(u))
    } else {
        Numeric::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    match (numeric(x), numeric(y)) {
        (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
        (Numeric::Int(a), Numeric::Float(b)) => compare_int_float(a, b),
        (Numeric::Float(a), Numeric::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
        (Numeric::Float(a), Numeric::Float(b)) => a.partial_cmp(&b),
    }
}

/// Exact comparison of an integer with a float, without rounding the
/// integer through `f64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn compare_int_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    // i128::MIN as f64 is exactly -2^127; i128::MAX as f64 rounds up to 2^127.
    if float >= i128::MAX as f64 {
        return Some(Ordering::Less);
    }
    if float < i128::MIN as f64 {
        return Some(Ordering::Greater);
    }
    let floor = float.floor();
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

/// Canonical text of a value: object keys sorted, integral floats in the
/// 64-bit integer range written as integers. Two values share a key iff
/// they are deeply equal under [`values_equal`].
#[must_use]
pub fn canonical_key(value: &Value) -> String {
    canonicalize(value).to_string()
}

/// 2^64, the first float past `u64::MAX`.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < TWO_POW_64 => {
                if f >= 0.0 {
                    Value::from(f as u64)
                } else {
                    Value::from(f as i64)
                }
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let sorted: Map<String, Value> = keys
                .into_iter()
                .map(|k| (k.clone(), canonicalize(&map[k])))
                .collect();
            Value::Object(sorted)
        }
        _ => value.clone(),
    }
}

/// Length of strings (characters), arrays and objects.
#[must_use]
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

/// Whether `key` exists on `object` with a non-null value.
#[must_use]
pub fn is_present(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(|v| !v.is_null())
}

/// Short JSON rendering of a value for messages.
#[must_use]
pub fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_LIMIT {
        return text;
    }
    let mut cut: String = text.chars().take(PREVIEW_LIMIT).collect();
    cut.push_str("...");
    cut
}

/// A float as a JSON value. Non-finite numbers have no JSON form and are
/// written as the strings `"inf"`, `"-inf"` and `"nan"`.
#[must_use]
pub fn number_value(n: f64) -> Value {
    if n.is_finite() {
        Value::from(n)
    } else if n.is_nan() {
        Value::from("nan")
    } else if n > 0.0 {
        Value::from("inf")
    } else {
        Value::from("-inf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_equal_integral_floats() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
        assert!(!values_equal(&json!(1), &json!(true)));
        assert!(!values_equal(&json!("1"), &json!(1)));
    }

    #[test]
    fn ordering_is_defined_for_numbers_and_strings_only() {
        assert_eq!(compare(&json!(2), &json!(1.5)), Some(Ordering::Greater));
        assert_eq!(compare(&json!("a"), &json!("b")), Some(Ordering::Less));
        assert_eq!(compare(&json!("a"), &json!(1)), None);
        assert_eq!(compare(&json!(true), &json!(false)), None);
    }

    #[test]
    fn canonical_keys_ignore_key_order_and_float_form() {
        assert_eq!(
            canonical_key(&json!({"b": 1, "a": 2.0})),
            canonical_key(&json!({"a": 2, "b": 1.0}))
        );
        assert_ne!(canonical_key(&json!(1)), canonical_key(&json!("1")));
    }

    #[test]
    fn large_integers_compare_exactly() {
        let i64_max = json!(i64::MAX);
        let past_i64 = json!(9_223_372_036_854_775_808_u64);
        assert!(!values_equal(&past_i64, &i64_max));
        assert_eq!(compare(&past_i64, &i64_max), Some(Ordering::Greater));
        assert_ne!(canonical_key(&past_i64), canonical_key(&i64_max));

        let two_pow_53 = json!(9_007_199_254_740_992_i64);
        let next = json!(9_007_199_254_740_993_i64);
        assert_eq!(compare(&next, &two_pow_53), Some(Ordering::Greater));
        assert!(!values_equal(&next, &two_pow_53));

        assert_eq!(compare(&json!(u64::MAX), &json!(-1)), Some(Ordering::Greater));
        assert_eq!(compare(&json!(i64::MIN), &json!(u64::MAX)), Some(Ordering::Less));
    }

    #[test]
    fn integers_against_floats_at_the_f64_edge() {
        // 2^53 + 1 has no f64 form; the nearest float is 2^53.
        let next = json!(9_007_199_254_740_993_i64);
        let float = json!(9_007_199_254_740_992.0);
        assert_eq!(compare(&next, &float), Some(Ordering::Greater));
        assert!(!values_equal(&next, &float));
        assert!(values_equal(&json!(9_007_199_254_740_992_i64), &float));
        assert_eq!(
            canonical_key(&json!(9_007_199_254_740_992_i64)),
            canonical_key(&float)
        );

        assert_eq!(compare(&json!(2), &json!(2.5)), Some(Ordering::Less));
        assert_eq!(compare(&json!(-2), &json!(-2.5)), Some(Ordering::Greater));
        assert_eq!(compare(&json!(3), &json!(2.5)), Some(Ordering::Greater));
        assert_eq!(compare(&json!(u64::MAX), &json!(1.0e30)), Some(Ordering::Less));
        assert_eq!(compare(&json!(i64::MIN), &json!(-1.0e30)), Some(Ordering::Greater));
        assert!(values_equal(&json!(-0.0), &json!(0)));
        assert_eq!(canonical_key(&json!(-0.0)), canonical_key(&json!(0)));
    }

    #[test]
    fn preview_truncates_long_values() {
        let long = json!("x".repeat(200));
        assert!(preview(&long).ends_with("..."));
        assert_eq!(preview(&json!(5)), "5");
    }

    #[test]
    fn non_finite_numbers_become_strings() {
        assert_eq!(number_value(f64::INFINITY), json!("inf"));
        assert_eq!(number_value(2.5), json!(2.5));
    }
}
