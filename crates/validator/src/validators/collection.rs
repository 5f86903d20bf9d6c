//! Array and object predicates.

use std::collections::HashSet;

use serde_json::Value;

use crate::check::LengthBounds;
use crate::foundation::value::{canonical_key, preview, values_equal};
use crate::foundation::{JsonType, ValidationResult};
use crate::validators::{with_array, with_object};

// ============================================================================
// ARRAYS
// ============================================================================

/// Array has at least `min` items.
#[must_use]
pub fn array_min_length(data: &Value, min: usize) -> ValidationResult {
    array_length(data, LengthBounds { min: Some(min), max: None })
}

/// Array has at most `max` items.
#[must_use]
pub fn array_max_length(data: &Value, max: usize) -> ValidationResult {
    array_length(data, LengthBounds { min: None, max: Some(max) })
}

/// Array item count within whichever bounds are set.
#[must_use]
pub fn array_length(data: &Value, bounds: LengthBounds) -> ValidationResult {
    with_array(data, |items| {
        let count = items.len();
        let result = match bounds {
            LengthBounds { min: Some(min), .. } if count < min => ValidationResult::fail(format!(
                "Array has {count} items, at least {min} required"
            )),
            LengthBounds { max: Some(max), .. } if count > max => ValidationResult::fail(format!(
                "Array has {count} items, at most {max} allowed"
            )),
            _ => ValidationResult::pass(),
        };
        result.with_detail("length", count)
    })
}

/// No two items are deeply equal.
#[must_use]
pub fn array_unique(data: &Value) -> ValidationResult {
    with_array(data, |items| {
        let mut seen = HashSet::with_capacity(items.len());
        let duplicates: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !seen.insert(canonical_key(item)))
            .map(|(i, _)| i)
            .collect();
        if duplicates.is_empty() {
            ValidationResult::pass()
        } else {
            ValidationResult::fail(format!(
                "Array contains {} duplicate item(s)",
                duplicates.len()
            ))
            .with_detail("duplicate_indices", duplicates)
        }
    })
}

/// Some item equals `item`.
#[must_use]
pub fn array_contains(data: &Value, item: &Value) -> ValidationResult {
    with_array(data, |items| match items.iter().position(|v| values_equal(v, item)) {
        Some(index) => ValidationResult::pass().with_detail("index", index),
        None => ValidationResult::fail(format!("Array does not contain {}", preview(item))),
    })
}

/// Every item has type `expected`.
#[must_use]
pub fn array_item_type(data: &Value, expected: JsonType) -> ValidationResult {
    with_array(data, |items| {
        let invalid: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !expected.matches(item))
            .map(|(i, _)| i)
            .collect();
        match invalid.first() {
            None => ValidationResult::pass(),
            Some(&first) => ValidationResult::fail(format!(
                "Item {first} is {}, expected {expected}",
                JsonType::of(&items[first])
            ))
            .with_detail("invalid_indices", invalid),
        }
    })
}

// ============================================================================
// OBJECTS
// ============================================================================

/// Object has the key (a `null` value still counts).
#[must_use]
pub fn has_property(data: &Value, property: &str) -> ValidationResult {
    with_object(data, |map| {
        ValidationResult::check(map.contains_key(property), || {
            format!("Missing property '{property}'")
        })
    })
}

/// Object has every key.
#[must_use]
pub fn has_properties(data: &Value, properties: &[String]) -> ValidationResult {
    with_object(data, |map| {
        let missing: Vec<&str> = properties
            .iter()
            .filter(|p| !map.contains_key(p.as_str()))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            ValidationResult::pass()
        } else {
            ValidationResult::fail(format!("Missing properties: {}", missing.join(", ")))
                .with_detail("missing_properties", missing)
        }
    })
}

/// Object property exists and has type `expected`.
#[must_use]
pub fn property_type(data: &Value, property: &str, expected: JsonType) -> ValidationResult {
    with_object(data, |map| match map.get(property) {
        None => ValidationResult::fail(format!("Missing property '{property}'")),
        Some(value) if expected.matches(value) => ValidationResult::pass(),
        Some(value) => ValidationResult::fail(format!(
            "Property '{property}' is {}, expected {expected}",
            JsonType::of(value)
        ))
        .with_detail("actual_type", JsonType::of(value).as_str()),
    })
}

/// Object property exists and equals `expected`.
#[must_use]
pub fn property_value(data: &Value, property: &str, expected: &Value) -> ValidationResult {
    with_object(data, |map| match map.get(property) {
        None => ValidationResult::fail(format!("Missing property '{property}'")),
        Some(value) if values_equal(value, expected) => ValidationResult::pass(),
        Some(value) => ValidationResult::fail(format!(
            "Property '{property}' is {}, expected {}",
            preview(value),
            preview(expected)
        )),
    })
}
