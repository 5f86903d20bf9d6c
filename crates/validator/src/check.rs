//! Typed checks.
//!
//! A [`Check`] is a rule kind with its parameters already converted to the
//! types its validator expects. Building one is the only place where
//! parameter payloads are inspected; evaluation is a plain `match` in the
//! registry. Regexes, schema patterns and nested rule lists are compiled
//! here too, so a check evaluated over a whole batch compiles them once.

use serde_json::{Map, Value};

use crate::combinators::Condition;
use crate::config::EngineConfig;
use crate::foundation::{EngineError, EngineResult, JsonType};
use crate::params::Params;
use crate::rule::{Rule, RuleEntry, RuleKind};
use crate::schema::CompiledSchema;
use crate::validators::constraint::CompiledPattern;
use crate::validators::quality::ConsistencyRule;

// ============================================================================
// PARAMETER TYPES
// ============================================================================

/// Inclusive or exclusive numeric bounds, depending on the kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Optional length bounds (at least one is set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    /// Smallest allowed length.
    pub min: Option<usize>,
    /// Largest allowed length.
    pub max: Option<usize>,
}

/// Needle for the substring predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// Text to look for.
    pub needle: String,
    /// Compare case-sensitively (default).
    pub case_sensitive: bool,
}

/// Parameters of the conditional kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalCheck {
    /// Decides which branch applies.
    pub condition: Condition,
    /// Rules applied (ALL) when the condition holds.
    pub then_rules: Vec<RuleCheck>,
    /// Rules applied (ALL) otherwise.
    pub else_rules: Vec<RuleCheck>,
}

/// One entry of a nested rule list, built ahead of evaluation.
///
/// An entry that could not be built keeps its error and fails on its own
/// when evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCheck {
    /// Wire tag of the rule, or the unknown tag it was given.
    pub name: String,
    /// The built check.
    pub check: EngineResult<Check>,
    /// Replaces the failure message when the rule fails.
    pub message: Option<String>,
}

impl RuleCheck {
    /// Builds one parsed (or unparseable) rule list entry.
    #[must_use]
    pub fn from_entry(entry: &RuleEntry, config: &EngineConfig) -> Self {
        match entry {
            Ok(rule) => Self::from_rule(rule, config),
            Err(e) => Self {
                name: match e {
                    EngineError::UnknownKind(tag) => tag.clone(),
                    _ => "invalid_rule".to_string(),
                },
                check: Err(e.clone()),
                message: None,
            },
        }
    }

    /// Builds a rule.
    #[must_use]
    pub fn from_rule(rule: &Rule, config: &EngineConfig) -> Self {
        Self {
            name: rule.kind.as_str().to_string(),
            check: Check::from_rule(rule, config),
            message: rule.message.clone(),
        }
    }

    /// Builds every entry of a rule list in wire form.
    #[must_use]
    pub fn list(raw: &Value, config: &EngineConfig) -> Vec<Self> {
        Rule::list_from_value(raw)
            .iter()
            .map(|entry| Self::from_entry(entry, config))
            .collect()
    }
}

// ============================================================================
// CHECK
// ============================================================================

/// A rule kind with typed parameters, ready to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    // Type predicates
    IsString,
    IsNumber,
    IsInteger,
    IsFloat,
    IsBoolean,
    IsArray,
    IsObject,
    IsNull,
    IsNotNull,

    // Format predicates; date/time kinds carry an optional explicit format
    Email,
    Url,
    Uuid,
    Date(Option<String>),
    Time(Option<String>),
    Datetime(Option<String>),
    Ipv4,
    Ipv6,
    IpAddress,
    MacAddress,
    Phone,
    CreditCard,
    PostalCode(String),
    Alpha,
    Alphanumeric,
    Numeric,
    Hex,
    Base64,
    Json,
    Xml,

    // Constraint predicates
    Required,
    NotEmpty,
    MinValue(f64),
    MaxValue(f64),
    Range(Bounds),
    MinLength(usize),
    MaxLength(usize),
    Length(LengthBounds),
    ExactLength(usize),
    Pattern(CompiledPattern),
    Enum(Vec<Value>),
    NotIn(Vec<Value>),

    // String predicates
    StartsWith(TextMatch),
    EndsWith(TextMatch),
    Contains(TextMatch),
    NotContains(TextMatch),
    Lowercase,
    Uppercase,

    // Array predicates
    ArrayMinLength(usize),
    ArrayMaxLength(usize),
    ArrayLength(LengthBounds),
    ArrayUnique,
    ArrayContains(Value),
    ArrayItemType(JsonType),

    // Object predicates
    HasProperty(String),
    HasProperties(Vec<String>),
    PropertyType { property: String, expected: JsonType },
    PropertyValue { property: String, expected: Value },

    // Comparison predicates
    Equals(Value),
    NotEquals(Value),
    GreaterThan(Value),
    GreaterThanOrEqual(Value),
    LessThan(Value),
    LessThanOrEqual(Value),
    Between(Bounds),

    // Composite predicates
    Schema(CompiledSchema),
    Custom(String),
    Conditional(ConditionalCheck),
    Dependency(Vec<(String, Vec<String>)>),
    All(Vec<RuleCheck>),
    Any(Vec<RuleCheck>),
    NoneOf(Vec<RuleCheck>),

    // Data-quality measures
    Completeness { required_fields: Vec<String>, threshold: f64 },
    Consistency(Vec<ConsistencyRule>),
    Uniqueness { key_field: Option<String> },
    Accuracy { reference: Value, tolerance: f64 },
}

impl Check {
    /// Builds the typed check for `params.kind()`. Regexes are compiled
    /// under the limits in `config`.
    pub fn from_params(params: &Params, config: &EngineConfig) -> EngineResult<Self> {
        use RuleKind as K;

        params.check_required()?;
        let kind = params.kind();

        let check = match kind {
            K::IsString => Self::IsString,
            K::IsNumber => Self::IsNumber,
            K::IsInteger => Self::IsInteger,
            K::IsFloat => Self::IsFloat,
            K::IsBoolean => Self::IsBoolean,
            K::IsArray => Self::IsArray,
            K::IsObject => Self::IsObject,
            K::IsNull => Self::IsNull,
            K::IsNotNull => Self::IsNotNull,

            K::Email => Self::Email,
            K::Url => Self::Url,
            K::Uuid => Self::Uuid,
            K::Date => Self::Date(params.string("format")?),
            K::Time => Self::Time(params.string("format")?),
            K::Datetime => Self::Datetime(params.string("format")?),
            K::Ipv4 => Self::Ipv4,
            K::Ipv6 => Self::Ipv6,
            K::IpAddress => Self::IpAddress,
            K::MacAddress => Self::MacAddress,
            K::Phone => Self::Phone,
            K::CreditCard => Self::CreditCard,
            K::PostalCode => {
                Self::PostalCode(params.string("country")?.unwrap_or_else(|| "US".into()))
            }
            K::Alpha => Self::Alpha,
            K::Alphanumeric => Self::Alphanumeric,
            K::Numeric => Self::Numeric,
            K::Hex => Self::Hex,
            K::Base64 => Self::Base64,
            K::Json => Self::Json,
            K::Xml => Self::Xml,

            K::Required => Self::Required,
            K::NotEmpty => Self::NotEmpty,
            K::MinValue => Self::MinValue(params.required_number("min_value")?),
            K::MaxValue => Self::MaxValue(params.required_number("max_value")?),
            K::Range => Self::Range(bounds(params)?),
            K::MinLength => Self::MinLength(params.required_count("min_length")?),
            K::MaxLength => Self::MaxLength(params.required_count("max_length")?),
            K::Length => Self::Length(length_bounds(params, "min_length", "max_length")?),
            K::ExactLength => Self::ExactLength(params.required_count("length")?),
            K::Pattern => {
                Self::Pattern(CompiledPattern::new(params.required_string("pattern")?, config))
            }
            K::Enum => Self::Enum(params.required_list("allowed_values")?.clone()),
            K::NotIn => Self::NotIn(params.required_list("forbidden_values")?.clone()),

            K::StartsWith => Self::StartsWith(text_match(params, "prefix")?),
            K::EndsWith => Self::EndsWith(text_match(params, "suffix")?),
            K::Contains => Self::Contains(text_match(params, "substring")?),
            K::NotContains => Self::NotContains(text_match(params, "substring")?),
            K::Lowercase => Self::Lowercase,
            K::Uppercase => Self::Uppercase,

            K::ArrayMinLength => Self::ArrayMinLength(params.required_count("min_items")?),
            K::ArrayMaxLength => Self::ArrayMaxLength(params.required_count("max_items")?),
            K::ArrayLength => Self::ArrayLength(length_bounds(params, "min_items", "max_items")?),
            K::ArrayUnique => Self::ArrayUnique,
            K::ArrayContains => Self::ArrayContains(params.require("item")?.clone()),
            K::ArrayItemType => Self::ArrayItemType(json_type(params, "item_type")?),

            K::HasProperty => Self::HasProperty(params.required_string("property")?),
            K::HasProperties => Self::HasProperties(params.required_strings("properties")?),
            K::PropertyType => Self::PropertyType {
                property: params.required_string("property")?,
                expected: json_type(params, "expected_type")?,
            },
            K::PropertyValue => Self::PropertyValue {
                property: params.required_string("property")?,
                expected: params.require("expected")?.clone(),
            },

            K::Equals => Self::Equals(params.require("compare_value")?.clone()),
            K::NotEquals => Self::NotEquals(params.require("compare_value")?.clone()),
            K::GreaterThan => Self::GreaterThan(params.require("compare_value")?.clone()),
            K::GreaterThanOrEqual => {
                Self::GreaterThanOrEqual(params.require("compare_value")?.clone())
            }
            K::LessThan => Self::LessThan(params.require("compare_value")?.clone()),
            K::LessThanOrEqual => Self::LessThanOrEqual(params.require("compare_value")?.clone()),
            K::Between => Self::Between(bounds(params)?),

            K::Schema => {
                Self::Schema(CompiledSchema::new(params.required_map("schema")?.clone(), config))
            }
            K::Custom => Self::Custom(params.required_string("function")?),
            K::Conditional => Self::Conditional(ConditionalCheck {
                condition: Condition::parse(params.require("condition")?)
                    .map_err(|reason| params.invalid("condition", reason))?,
                then_rules: rule_list(params, "then_rules", config),
                else_rules: rule_list(params, "else_rules", config),
            }),
            K::Dependency => Self::Dependency(dependencies(params)?),
            K::All => Self::All(rule_list(params, "rules", config)),
            K::Any => Self::Any(rule_list(params, "rules", config)),
            K::NoneOf => Self::NoneOf(rule_list(params, "rules", config)),

            K::Completeness => Self::Completeness {
                required_fields: params.required_strings("required_fields")?,
                threshold: params.number("threshold")?.unwrap_or(1.0),
            },
            K::Consistency => Self::Consistency(
                params
                    .required_list("consistency_rules")?
                    .iter()
                    .map(|raw| {
                        ConsistencyRule::parse(raw)
                            .map_err(|reason| params.invalid("consistency_rules", reason))
                    })
                    .collect::<EngineResult<_>>()?,
            ),
            K::Uniqueness => Self::Uniqueness {
                key_field: params.string("key_field")?,
            },
            K::Accuracy => Self::Accuracy {
                reference: params.require("reference")?.clone(),
                tolerance: params.number("tolerance")?.unwrap_or(0.0).abs(),
            },
        };

        Ok(check)
    }

    /// Builds the typed check for a request's named parameters.
    pub fn from_named(
        kind: RuleKind,
        named: &Map<String, Value>,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        Self::from_params(&Params::from_named(kind, named), config)
    }

    /// Builds the typed check for a rule.
    pub fn from_rule(rule: &Rule, config: &EngineConfig) -> EngineResult<Self> {
        let params = match &rule.value {
            Some(value) => Params::from_rule_value(rule.kind, value),
            None => Params::empty(rule.kind),
        };
        Self::from_params(&params, config)
    }
}

fn bounds(params: &Params) -> EngineResult<Bounds> {
    let min = params.required_number("min_value")?;
    let max = params.required_number("max_value")?;
    if min > max {
        return Err(params.invalid(
            "min_value",
            format!("minimum {min} is greater than maximum {max}"),
        ));
    }
    Ok(Bounds { min, max })
}

fn length_bounds(
    params: &Params,
    min_name: &'static str,
    max_name: &'static str,
) -> EngineResult<LengthBounds> {
    let min = params.count(min_name)?;
    let max = params.count(max_name)?;
    match (min, max) {
        (None, None) => Err(params.invalid(min_name, format!("set {min_name} or {max_name}"))),
        (Some(lo), Some(hi)) if lo > hi => Err(params.invalid(
            min_name,
            format!("minimum {lo} is greater than maximum {hi}"),
        )),
        _ => Ok(LengthBounds { min, max }),
    }
}

fn text_match(params: &Params, name: &'static str) -> EngineResult<TextMatch> {
    Ok(TextMatch {
        needle: params.required_string(name)?,
        case_sensitive: params.boolean("case_sensitive")?.unwrap_or(true),
    })
}

fn json_type(params: &Params, name: &'static str) -> EngineResult<JsonType> {
    params
        .required_string(name)?
        .parse()
        .map_err(|e: crate::foundation::UnknownType| params.invalid(name, e.to_string()))
}

fn rule_list(params: &Params, name: &'static str, config: &EngineConfig) -> Vec<RuleCheck> {
    params
        .get(name)
        .map(|raw| RuleCheck::list(raw, config))
        .unwrap_or_default()
}

fn dependencies(params: &Params) -> EngineResult<Vec<(String, Vec<String>)>> {
    params
        .required_map("dependencies")?
        .iter()
        .map(|(field, companions)| {
            let companions = match companions {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            params.invalid(
                                "dependencies",
                                format!("companions of '{field}' must be strings, found {item}"),
                            )
                        })
                    })
                    .collect::<EngineResult<_>>()?,
                other => {
                    return Err(params.invalid(
                        "dependencies",
                        format!("companions of '{field}' must be a list, got {other}"),
                    ));
                }
            };
            Ok((field.clone(), companions))
        })
        .collect()
}
