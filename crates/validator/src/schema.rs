//! Declarative object schemas.
//!
//! A schema is a JSON object with two optional keys:
//!
//! ```json
//! {
//!   "required": ["name", "address"],
//!   "properties": {
//!     "name":    {"type": "string", "minLength": 1},
//!     "age":     {"type": "integer", "minimum": 0, "maximum": 150},
//!     "address": {"type": "object", "required": ["zip"],
//!                 "properties": {"zip": {"type": "string", "pattern": "^\\d{5}$"}}},
//!     "tags":    {"type": "array", "items": {"type": "string"}}
//!   }
//! }
//! ```
//!
//! Each property present in the data is type checked, then its constraints
//! run in the order `minimum`, `maximum`, `minLength`, `maxLength`,
//! `pattern`, `enum`; the first failure is the property's one error. Object
//! values recurse into their own `required`/`properties`, array values into
//! `items`. Errors carry the path of the offending field (`address.zip`,
//! `tags[2]`).

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::foundation::{JsonType, ValidationResult};
use crate::validators::constraint::{self, CompiledPattern};

const CONSTRAINT_ORDER: [&str; 6] = [
    "minimum",
    "maximum",
    "minLength",
    "maxLength",
    "pattern",
    "enum",
];

/// A schema definition with every `pattern` it mentions compiled up front.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    definition: Map<String, Value>,
    patterns: HashMap<String, CompiledPattern>,
}

impl PartialEq for CompiledSchema {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
    }
}

impl CompiledSchema {
    /// Walks `definition` through `properties` and `items`, compiling each
    /// distinct pattern once.
    #[must_use]
    pub fn new(definition: Map<String, Value>, limits: &EngineConfig) -> Self {
        let mut patterns = HashMap::new();
        collect_patterns(&definition, limits, &mut patterns);
        Self {
            definition,
            patterns,
        }
    }

    /// The schema as given.
    #[must_use]
    pub fn definition(&self) -> &Map<String, Value> {
        &self.definition
    }

    /// Number of distinct compiled patterns.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

fn collect_patterns(
    schema: &Map<String, Value>,
    limits: &EngineConfig,
    patterns: &mut HashMap<String, CompiledPattern>,
) {
    if let Some(Value::String(source)) = schema.get("pattern") {
        patterns
            .entry(source.clone())
            .or_insert_with(|| CompiledPattern::new(source.as_str(), limits));
    }
    if let Some(Value::Object(properties)) = schema.get("properties") {
        for sub_schema in properties.values() {
            if let Value::Object(sub_schema) = sub_schema {
                collect_patterns(sub_schema, limits, patterns);
            }
        }
    }
    if let Some(Value::Object(items)) = schema.get("items") {
        collect_patterns(items, limits, patterns);
    }
}

/// Validates `data` against `schema`. Valid iff no errors accumulate; the
/// `errors` detail lists every one of them.
#[must_use]
pub fn validate_schema(
    data: &Value,
    schema: &CompiledSchema,
    limits: &EngineConfig,
) -> ValidationResult {
    let Value::Object(object) = data else {
        return ValidationResult::type_mismatch("object", data);
    };
    let mut walker = SchemaWalker {
        limits,
        patterns: &schema.patterns,
        errors: Vec::new(),
    };
    walker.object(object, &schema.definition, "", 0);

    let SchemaWalker { errors, .. } = walker;
    let result = if errors.is_empty() {
        ValidationResult::pass()
    } else {
        ValidationResult::fail(format!("Schema validation failed: {}", errors.join("; ")))
    };
    result.with_detail("errors", errors)
}

struct SchemaWalker<'a> {
    limits: &'a EngineConfig,
    patterns: &'a HashMap<String, CompiledPattern>,
    errors: Vec<String>,
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

impl SchemaWalker<'_> {
    fn object(
        &mut self,
        data: &Map<String, Value>,
        schema: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) {
        if depth > self.limits.max_schema_depth {
            self.errors.push(format!(
                "{path}: schema nesting exceeds the limit of {}",
                self.limits.max_schema_depth
            ));
            return;
        }

        match schema.get("required") {
            None | Some(Value::Null) => {}
            Some(Value::Array(names)) => {
                for name in names {
                    match name.as_str() {
                        Some(name) if data.get(name).is_some_and(|v| !v.is_null()) => {}
                        Some(name) => self
                            .errors
                            .push(format!("Missing required field: {}", join(path, name))),
                        None => self.errors.push(format!(
                            "{}: entries must be field names, got {name}",
                            join(path, "required")
                        )),
                    }
                }
            }
            Some(_) => self
                .errors
                .push(format!("{}: must be a list of field names", join(path, "required"))),
        }

        match schema.get("properties") {
            None | Some(Value::Null) => {}
            Some(Value::Object(properties)) => {
                for (name, sub_schema) in properties {
                    if let Some(value) = data.get(name) {
                        self.property(value, sub_schema, &join(path, name), depth);
                    }
                }
            }
            Some(_) => self
                .errors
                .push(format!("{}: must be an object", join(path, "properties"))),
        }
    }

    fn property(&mut self, value: &Value, schema: &Value, path: &str, depth: usize) {
        let Value::Object(schema) = schema else {
            self.errors.push(format!("{path}: property schema must be an object"));
            return;
        };

        if let Some(error) = self.first_violation(value, schema) {
            self.errors.push(format!("{path}: {error}"));
            return;
        }

        match value {
            Value::Object(object)
                if schema.contains_key("properties") || schema.contains_key("required") =>
            {
                self.object(object, schema, path, depth + 1);
            }
            Value::Array(items) => {
                if let Some(item_schema) = schema.get("items") {
                    if depth + 1 > self.limits.max_schema_depth {
                        self.errors.push(format!(
                            "{path}: schema nesting exceeds the limit of {}",
                            self.limits.max_schema_depth
                        ));
                        return;
                    }
                    for (index, item) in items.iter().enumerate() {
                        self.property(item, item_schema, &format!("{path}[{index}]"), depth + 1);
                    }
                }
            }
            _ => {}
        }
    }

    /// The type check and then each constraint in order; the first failure
    /// wins.
    fn first_violation(&self, value: &Value, schema: &Map<String, Value>) -> Option<String> {
        if let Some(type_name) = schema.get("type") {
            let Some(type_name) = type_name.as_str() else {
                return Some(format!("'type' must be a string, got {type_name}"));
            };
            let expected: JsonType = match type_name.parse() {
                Ok(expected) => expected,
                Err(e) => return Some(format!("schema error: {e}")),
            };
            if !expected.matches(value) {
                return Some(format!("Expected {expected}, got {}", JsonType::of(value)));
            }
        }

        for keyword in CONSTRAINT_ORDER {
            let Some(parameter) = schema.get(keyword) else {
                continue;
            };
            match self.constraint(keyword, parameter, value) {
                Ok(result) if result.is_valid() => {}
                Ok(result) => return result.message().map(str::to_string),
                Err(reason) => return Some(format!("schema error: '{keyword}' {reason}")),
            }
        }
        None
    }

    fn constraint(
        &self,
        keyword: &str,
        parameter: &Value,
        value: &Value,
    ) -> Result<ValidationResult, String> {
        match keyword {
            "minimum" => number(parameter).map(|n| constraint::min_value(value, n)),
            "maximum" => number(parameter).map(|n| constraint::max_value(value, n)),
            "minLength" => count(parameter).map(|n| constraint::min_length(value, n)),
            "maxLength" => count(parameter).map(|n| constraint::max_length(value, n)),
            "pattern" => {
                let source = parameter
                    .as_str()
                    .ok_or_else(|| format!("must be a string, got {parameter}"))?;
                Ok(match self.patterns.get(source) {
                    Some(compiled) => constraint::pattern(value, compiled, self.limits),
                    None => {
                        let compiled = CompiledPattern::new(source, self.limits);
                        constraint::pattern(value, &compiled, self.limits)
                    }
                })
            }
            "enum" => parameter
                .as_array()
                .map(|allowed| constraint::one_of(value, allowed))
                .ok_or_else(|| format!("must be a list, got {parameter}")),
            other => Err(format!("is not a supported keyword: {other}")),
        }
    }
}

fn number(bound: &Value) -> Result<f64, String> {
    bound.as_f64().ok_or_else(|| format!("must be a number, got {bound}"))
}

fn count(bound: &Value) -> Result<usize, String> {
    bound
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| format!("must be a non-negative integer, got {bound}"))
}
