//! Branching on a condition tested against the value.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::check::ConditionalCheck;
use crate::combinators::{RuleEvaluator, logical};
use crate::foundation::ValidationResult;
use crate::foundation::value::{compare, values_equal};

/// How a [`Condition`] compares its subject with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionTest {
    /// Deep equality.
    Equals,
    /// Deep inequality.
    NotEquals,
    /// Subject orders after the value.
    GreaterThan,
    /// Subject orders before the value.
    LessThan,
    /// Substring of text, item of an array or key of an object.
    Contains,
    /// Equality of a named property; requires `property`.
    PropertyEquals,
}

impl ConditionTest {
    /// Wire name of the test.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Contains => "contains",
            Self::PropertyEquals => "property_equals",
        }
    }
}

impl fmt::Display for ConditionTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionTest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(Self::Equals),
            "not_equals" => Ok(Self::NotEquals),
            "greater_than" => Ok(Self::GreaterThan),
            "less_than" => Ok(Self::LessThan),
            "contains" => Ok(Self::Contains),
            "property_equals" => Ok(Self::PropertyEquals),
            other => Err(format!("unknown condition type '{other}'")),
        }
    }
}

/// A boolean test on the value, or on one of its properties.
///
/// Wire form: `{"type": "<test>", "value": <operand>, "property": "<key>"}`.
/// With `property` set the test applies to that property of an object
/// value; a missing property reads as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Comparison to perform.
    pub test: ConditionTest,
    /// Operand on the right-hand side.
    pub value: Value,
    /// Property of the data to test instead of the data itself.
    pub property: Option<String>,
}

impl Condition {
    /// Reads a condition from its wire form.
    pub fn parse(raw: &Value) -> Result<Self, String> {
        let Value::Object(map) = raw else {
            return Err(format!("condition must be an object, got {raw}"));
        };
        let test: ConditionTest = match map.get("type") {
            Some(Value::String(tag)) => tag.parse()?,
            Some(other) => return Err(format!("condition type must be a string, got {other}")),
            None => return Err("condition needs a 'type'".to_string()),
        };
        let property = match map.get("property") {
            None | Some(Value::Null) => None,
            Some(Value::String(p)) => Some(p.clone()),
            Some(other) => return Err(format!("condition property must be a string, got {other}")),
        };
        if test == ConditionTest::PropertyEquals && property.is_none() {
            return Err("property_equals condition needs a 'property'".to_string());
        }
        Ok(Self {
            test,
            value: map.get("value").cloned().unwrap_or(Value::Null),
            property,
        })
    }

    /// Evaluates the condition on `data`.
    #[must_use]
    pub fn holds(&self, data: &Value) -> bool {
        let subject = match &self.property {
            Some(property) => data.get(property).unwrap_or(&Value::Null),
            None => data,
        };
        match self.test {
            ConditionTest::Equals | ConditionTest::PropertyEquals => {
                values_equal(subject, &self.value)
            }
            ConditionTest::NotEquals => !values_equal(subject, &self.value),
            ConditionTest::GreaterThan => compare(subject, &self.value) == Some(Ordering::Greater),
            ConditionTest::LessThan => compare(subject, &self.value) == Some(Ordering::Less),
            ConditionTest::Contains => match (subject, &self.value) {
                (Value::String(text), Value::String(needle)) => text.contains(needle.as_str()),
                (Value::Array(items), needle) => items.iter().any(|v| values_equal(v, needle)),
                (Value::Object(map), Value::String(key)) => map.contains_key(key),
                _ => false,
            },
        }
    }
}

/// Applies the `then` rules (ALL) when the condition holds, the `else` rules
/// otherwise. A missing branch is an empty list and therefore valid.
pub fn conditional(
    evaluator: &impl RuleEvaluator,
    check: &ConditionalCheck,
    data: &Value,
) -> ValidationResult {
    let met = check.condition.holds(data);
    let (branch, rules) = if met {
        ("then", &check.then_rules)
    } else {
        ("else", &check.else_rules)
    };
    logical::all(evaluator, rules, data)
        .with_detail("condition_met", met)
        .with_detail("branch", branch)
}
