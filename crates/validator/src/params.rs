//! Parameter normalization.
//!
//! Parameters arrive in three shapes: a bare scalar (`"value": 3`), an
//! ordered list (`"value": [1, 10]`) or a named map (`{"min_value": 1}`).
//! [`Params`] folds all of them into one map keyed by canonical parameter
//! names, using the kind's [`ParamSpec`] list, and offers typed getters that
//! report [`EngineError`]s naming the kind and parameter.

use serde_json::{Map, Value};

use crate::foundation::{EngineError, EngineResult};
use crate::rule::{ParamSpec, RuleKind, Shape};

/// Named parameters of one kind, keyed by canonical name.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    kind: RuleKind,
    values: Map<String, Value>,
}

impl Params {
    /// Parameters from a named map (a request body or a named rule value).
    /// Aliases are resolved; unknown keys are ignored.
    #[must_use]
    pub fn from_named(kind: RuleKind, named: &Map<String, Value>) -> Self {
        let mut values = Map::new();
        for spec in kind.params() {
            let found = named.get(spec.name).or_else(|| {
                spec.aliases
                    .iter()
                    .find_map(|alias| named.get(*alias))
            });
            if let Some(value) = found {
                values.insert(spec.name.to_string(), value.clone());
            }
        }
        Self { kind, values }
    }

    /// No parameters at all.
    #[must_use]
    pub fn empty(kind: RuleKind) -> Self {
        Self {
            kind,
            values: Map::new(),
        }
    }

    /// Parameters from a rule's raw payload of any shape.
    ///
    /// - `null` binds to an any-shaped first parameter, otherwise nothing.
    /// - A map naming any declared parameter is read as named parameters;
    ///   otherwise it binds whole to a map- or any-shaped first parameter.
    /// - A list binds whole to a list- or any-shaped first parameter;
    ///   otherwise its items bind positionally.
    /// - A scalar binds to the first parameter.
    #[must_use]
    pub fn from_rule_value(kind: RuleKind, value: &Value) -> Self {
        let specs = kind.params();
        let first = specs.first();
        let mut values = Map::new();

        match value {
            Value::Null => {
                if let Some(spec) = first.filter(|s| s.shape == Shape::Any) {
                    values.insert(spec.name.to_string(), Value::Null);
                }
            }
            Value::Object(map) => {
                let named = map
                    .keys()
                    .any(|key| specs.iter().any(|spec| spec.answers_to(key)));
                if named {
                    return Self::from_named(kind, map);
                }
                if let Some(spec) = first.filter(|s| matches!(s.shape, Shape::Map | Shape::Any)) {
                    values.insert(spec.name.to_string(), value.clone());
                }
            }
            Value::Array(items) => match first {
                Some(spec) if matches!(spec.shape, Shape::List | Shape::Any) => {
                    values.insert(spec.name.to_string(), value.clone());
                }
                _ => {
                    for (spec, item) in specs.iter().zip(items) {
                        values.insert(spec.name.to_string(), item.clone());
                    }
                }
            },
            scalar => {
                if let Some(spec) = first {
                    values.insert(spec.name.to_string(), scalar.clone());
                }
            }
        }

        Self { kind, values }
    }

    /// The kind these parameters belong to.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Raw value of a parameter. `null` counts as absent unless the
    /// parameter accepts any value, in which case it is an operand.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .filter(|v| !v.is_null() || self.accepts_any(name))
    }

    fn accepts_any(&self, name: &str) -> bool {
        self.kind
            .params()
            .iter()
            .any(|spec| spec.name == name && spec.shape == Shape::Any)
    }

    /// Raw value of a parameter that must be present.
    pub fn require(&self, name: &'static str) -> EngineResult<&Value> {
        self.get(name).ok_or(EngineError::MissingParameter {
            kind: self.kind,
            param: name,
        })
    }

    /// Checks that every required parameter of the kind is present.
    pub fn check_required(&self) -> EngineResult<()> {
        self.kind
            .params()
            .iter()
            .filter(|spec| spec.required)
            .try_for_each(|spec: &ParamSpec| self.require(spec.name).map(|_| ()))
    }

    /// Optional number parameter.
    pub fn number(&self, name: &'static str) -> EngineResult<Option<f64>> {
        self.get(name)
            .map(|v| match v {
                Value::Number(n) => n
                    .as_f64()
                    .ok_or_else(|| self.invalid(name, "number out of range")),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| self.invalid(name, format!("expected a number, got \"{s}\""))),
                other => Err(self.invalid(name, format!("expected a number, got {other}"))),
            })
            .transpose()
    }

    /// Required number parameter.
    pub fn required_number(&self, name: &'static str) -> EngineResult<f64> {
        self.require(name)?;
        self.number(name).map(|n| n.unwrap_or_default())
    }

    /// Optional non-negative integer parameter.
    pub fn count(&self, name: &'static str) -> EngineResult<Option<usize>> {
        self.get(name)
            .map(|v| {
                let n = match v {
                    Value::Number(n) => n
                        .as_u64()
                        .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                };
                n.map(|n| n as usize).ok_or_else(|| {
                    self.invalid(name, format!("expected a non-negative integer, got {v}"))
                })
            })
            .transpose()
    }

    /// Required non-negative integer parameter.
    pub fn required_count(&self, name: &'static str) -> EngineResult<usize> {
        self.require(name)?;
        self.count(name).map(|n| n.unwrap_or_default())
    }

    /// Optional string parameter.
    pub fn string(&self, name: &'static str) -> EngineResult<Option<String>> {
        self.get(name)
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(name, format!("expected a string, got {v}")))
            })
            .transpose()
    }

    /// Required string parameter.
    pub fn required_string(&self, name: &'static str) -> EngineResult<String> {
        self.require(name)?;
        self.string(name).map(Option::unwrap_or_default)
    }

    /// Optional boolean parameter.
    pub fn boolean(&self, name: &'static str) -> EngineResult<Option<bool>> {
        self.get(name)
            .map(|v| match v {
                Value::Bool(b) => Ok(*b),
                Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
                Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
                other => Err(self.invalid(name, format!("expected a boolean, got {other}"))),
            })
            .transpose()
    }

    /// Optional list parameter.
    pub fn list(&self, name: &'static str) -> EngineResult<Option<&Vec<Value>>> {
        self.get(name)
            .map(|v| {
                v.as_array()
                    .ok_or_else(|| self.invalid(name, format!("expected a list, got {v}")))
            })
            .transpose()
    }

    /// Required list parameter.
    pub fn required_list(&self, name: &'static str) -> EngineResult<&Vec<Value>> {
        self.require(name)?;
        self.list(name)?.ok_or(EngineError::MissingParameter {
            kind: self.kind,
            param: name,
        })
    }

    /// Required list of strings. A single string is a one-item list.
    pub fn required_strings(&self, name: &'static str) -> EngineResult<Vec<String>> {
        match self.require(name)? {
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        self.invalid(name, format!("expected a list of strings, found {item}"))
                    })
                })
                .collect(),
            other => Err(self.invalid(name, format!("expected a list of strings, got {other}"))),
        }
    }

    /// Required object parameter.
    pub fn required_map(&self, name: &'static str) -> EngineResult<&Map<String, Value>> {
        let value = self.require(name)?;
        value
            .as_object()
            .ok_or_else(|| self.invalid(name, format!("expected an object, got {value}")))
    }

    /// An [`EngineError::InvalidParameter`] for this kind.
    pub fn invalid(&self, name: &'static str, reason: impl Into<String>) -> EngineError {
        EngineError::invalid(self.kind, name, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn named(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn scalar_binds_first_param() {
        let params = Params::from_rule_value(RuleKind::MinLength, &json!(3));
        assert_eq!(params.count("min_length"), Ok(Some(3)));
    }

    #[test]
    fn list_binds_positionally_for_scalar_params() {
        let params = Params::from_rule_value(RuleKind::Range, &json!([1, 10]));
        assert_eq!(params.required_number("min_value"), Ok(1.0));
        assert_eq!(params.required_number("max_value"), Ok(10.0));
    }

    #[test]
    fn list_binds_whole_for_list_params() {
        let params = Params::from_rule_value(RuleKind::Enum, &json!(["a", "b"]));
        assert_eq!(params.required_list("allowed_values").unwrap().len(), 2);
    }

    #[test]
    fn map_with_declared_names_is_named() {
        let params = Params::from_rule_value(RuleKind::Range, &json!({"min": 1, "max_value": 5}));
        assert_eq!(params.required_number("min_value"), Ok(1.0));
        assert_eq!(params.required_number("max_value"), Ok(5.0));
    }

    #[test]
    fn map_without_declared_names_binds_whole() {
        let schema = json!({"required": ["email"]});
        let params = Params::from_rule_value(RuleKind::Schema, &schema);
        assert_eq!(params.get("schema"), Some(&schema));

        let params = Params::from_rule_value(RuleKind::Equals, &json!({"a": 1}));
        assert_eq!(params.get("compare_value"), Some(&json!({"a": 1})));
    }

    #[test]
    fn named_request_resolves_aliases() {
        let params = Params::from_named(RuleKind::Pattern, &named(json!({"regex": "^a"})));
        assert_eq!(params.required_string("pattern"), Ok("^a".to_string()));
    }

    #[test]
    fn missing_and_invalid_parameters_are_reported() {
        let params = Params::from_named(RuleKind::Range, &named(json!({"min_value": "x"})));
        assert_eq!(
            params.check_required(),
            Err(EngineError::MissingParameter {
                kind: RuleKind::Range,
                param: "max_value",
            })
        );
        assert!(matches!(
            params.number("min_value"),
            Err(EngineError::InvalidParameter { param: "min_value", .. })
        ));
    }

    #[test]
    fn null_counts_as_absent() {
        let params = Params::from_named(RuleKind::Date, &named(json!({"format": null})));
        assert_eq!(params.string("format"), Ok(None));
    }

    #[test]
    fn null_is_a_value_for_any_shaped_params() {
        let params = Params::from_named(RuleKind::Equals, &named(json!({"compare_value": null})));
        assert_eq!(params.require("compare_value"), Ok(&Value::Null));
        assert_eq!(params.check_required(), Ok(()));

        let params = Params::from_rule_value(RuleKind::Accuracy, &Value::Null);
        assert_eq!(params.get("reference"), Some(&Value::Null));

        let params = Params::from_rule_value(RuleKind::MinLength, &Value::Null);
        assert_eq!(params.get("min_length"), None);
        let params = Params::from_named(RuleKind::Range, &named(json!({"min_value": null})));
        assert!(params.require("min_value").is_err());
    }

    #[test]
    fn counts_reject_negative_and_fractional_values() {
        let params = Params::from_rule_value(RuleKind::MinLength, &json!(-1));
        assert!(params.count("min_length").is_err());
        let params = Params::from_rule_value(RuleKind::MinLength, &json!(2.5));
        assert!(params.count("min_length").is_err());
        let params = Params::from_rule_value(RuleKind::MinLength, &json!(4.0));
        assert_eq!(params.count("min_length"), Ok(Some(4)));
    }
}
