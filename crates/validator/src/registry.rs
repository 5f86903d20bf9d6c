//! The validator registry.
//!
//! [`ValidatorRegistry`] owns everything evaluation needs beyond the rule
//! itself: the [`EngineConfig`] limits and the [`PredicateTable`] behind the
//! `custom` kind. It is built once, never mutated afterwards, and is cheap
//! to share across threads.

use serde_json::{Map, Value};

use crate::batch::{self, BatchReport};
use crate::check::{Check, RuleCheck};
use crate::combinators::{self, RuleEvaluator, logical};
use crate::config::EngineConfig;
use crate::custom::PredicateTable;
use crate::foundation::{EngineResult, JsonType, ValidationResult};
use crate::rule::{Rule, RuleKind};
use crate::schema::validate_schema;
use crate::validators::{
    collection, comparison, constraint, datetime, format, network, quality, string, types, xml,
};

// ============================================================================
// REGISTRY
// ============================================================================

/// Dispatches checks to their validators.
///
/// # Examples
///
/// ```
/// use assay_validator::prelude::*;
/// use serde_json::json;
///
/// let registry = ValidatorRegistry::new();
/// let rule = Rule::new(RuleKind::Range, json!({"min_value": 1, "max_value": 10}));
/// assert!(registry.evaluate_rule(&rule, &json!(5)).is_valid());
/// assert!(!registry.evaluate_rule(&rule, &json!(15)).is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    config: EngineConfig,
    predicates: PredicateTable,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorRegistry {
    /// Default limits and the built-in custom predicates.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a [`RegistryBuilder`].
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Engine limits in effect.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Predicates available to the `custom` kind.
    #[must_use]
    pub fn predicates(&self) -> &PredicateTable {
        &self.predicates
    }

    /// Validates `data` with the kind named by `kind`, reading parameters by
    /// name from `params`.
    ///
    /// # Errors
    ///
    /// Returns an error when a required parameter is missing or malformed.
    /// A value that merely fails the check is an `Ok` with an invalid result.
    pub fn validate(
        &self,
        kind: RuleKind,
        params: &Map<String, Value>,
        data: &Value,
    ) -> EngineResult<ValidationResult> {
        let check = Check::from_named(kind, params, &self.config)?;
        let result = self.evaluate(&check, data);
        tracing::debug!(%kind, valid = result.is_valid(), "validated value");
        Ok(result)
    }

    /// Builds a check for `kind` from named parameters under this
    /// registry's limits. Build once and evaluate many times.
    ///
    /// # Errors
    ///
    /// Returns an error when a required parameter is missing or malformed.
    pub fn build_check(&self, kind: RuleKind, params: &Map<String, Value>) -> EngineResult<Check> {
        Check::from_named(kind, params, &self.config)
    }

    /// Evaluates one rule. Parameter errors become a failing result, and the
    /// rule's message override replaces the failure message.
    #[must_use]
    pub fn evaluate_rule(&self, rule: &Rule, data: &Value) -> ValidationResult {
        self.evaluate_entry(&RuleCheck::from_rule(rule, &self.config), data)
    }

    /// Runs `check` over every item of `items`.
    #[must_use]
    pub fn run_batch(&self, check: &Check, items: &[Value]) -> BatchReport {
        batch::run(self, check, items)
    }

    /// Evaluates a typed check.
    #[must_use]
    pub fn evaluate(&self, check: &Check, data: &Value) -> ValidationResult {
        match check {
            Check::IsString => types::is_type(data, JsonType::String),
            Check::IsNumber => types::is_type(data, JsonType::Number),
            Check::IsInteger => types::is_type(data, JsonType::Integer),
            Check::IsFloat => types::is_type(data, JsonType::Float),
            Check::IsBoolean => types::is_type(data, JsonType::Boolean),
            Check::IsArray => types::is_type(data, JsonType::Array),
            Check::IsObject => types::is_type(data, JsonType::Object),
            Check::IsNull => types::is_type(data, JsonType::Null),
            Check::IsNotNull => types::is_not_null(data),

            Check::Email => format::email(data),
            Check::Url => format::url(data),
            Check::Uuid => format::uuid(data),
            Check::Date(fmt) => datetime::date(data, fmt.as_deref()),
            Check::Time(fmt) => datetime::time(data, fmt.as_deref()),
            Check::Datetime(fmt) => datetime::datetime(data, fmt.as_deref()),
            Check::Ipv4 => network::ipv4(data),
            Check::Ipv6 => network::ipv6(data),
            Check::IpAddress => network::ip_address(data),
            Check::MacAddress => network::mac_address(data),
            Check::Phone => format::phone(data),
            Check::CreditCard => format::credit_card(data),
            Check::PostalCode(country) => format::postal_code(data, country),
            Check::Alpha => format::alpha(data),
            Check::Alphanumeric => format::alphanumeric(data),
            Check::Numeric => format::numeric(data),
            Check::Hex => format::hex(data),
            Check::Base64 => format::base64(data),
            Check::Json => format::json(data),
            Check::Xml => xml::xml(data),

            Check::Required => constraint::required(data),
            Check::NotEmpty => constraint::not_empty(data),
            Check::MinValue(min) => constraint::min_value(data, *min),
            Check::MaxValue(max) => constraint::max_value(data, *max),
            Check::Range(bounds) => constraint::range(data, *bounds),
            Check::MinLength(min) => constraint::min_length(data, *min),
            Check::MaxLength(max) => constraint::max_length(data, *max),
            Check::Length(bounds) => constraint::length(data, *bounds),
            Check::ExactLength(expected) => constraint::exact_length(data, *expected),
            Check::Pattern(pattern) => constraint::pattern(data, pattern, &self.config),
            Check::Enum(allowed) => constraint::one_of(data, allowed),
            Check::NotIn(forbidden) => constraint::not_in(data, forbidden),

            Check::StartsWith(prefix) => string::starts_with(data, prefix),
            Check::EndsWith(suffix) => string::ends_with(data, suffix),
            Check::Contains(needle) => string::contains(data, needle),
            Check::NotContains(needle) => string::not_contains(data, needle),
            Check::Lowercase => string::lowercase(data),
            Check::Uppercase => string::uppercase(data),

            Check::ArrayMinLength(min) => collection::array_min_length(data, *min),
            Check::ArrayMaxLength(max) => collection::array_max_length(data, *max),
            Check::ArrayLength(bounds) => collection::array_length(data, *bounds),
            Check::ArrayUnique => collection::array_unique(data),
            Check::ArrayContains(item) => collection::array_contains(data, item),
            Check::ArrayItemType(expected) => collection::array_item_type(data, *expected),

            Check::HasProperty(property) => collection::has_property(data, property),
            Check::HasProperties(properties) => collection::has_properties(data, properties),
            Check::PropertyType { property, expected } => {
                collection::property_type(data, property, *expected)
            }
            Check::PropertyValue { property, expected } => {
                collection::property_value(data, property, expected)
            }

            Check::Equals(expected) => comparison::equals(data, expected),
            Check::NotEquals(other) => comparison::not_equals(data, other),
            Check::GreaterThan(reference) => comparison::greater_than(data, reference),
            Check::GreaterThanOrEqual(reference) => {
                comparison::greater_than_or_equal(data, reference)
            }
            Check::LessThan(reference) => comparison::less_than(data, reference),
            Check::LessThanOrEqual(reference) => comparison::less_than_or_equal(data, reference),
            Check::Between(bounds) => comparison::between(data, *bounds),

            Check::Schema(schema) => validate_schema(data, schema, &self.config),
            Check::Custom(name) => self.predicates.evaluate(name, data),
            Check::Conditional(conditional) => combinators::conditional(self, conditional, data),
            Check::Dependency(dependencies) => combinators::dependency(data, dependencies),
            Check::All(rules) => logical::all(self, rules, data),
            Check::Any(rules) => logical::any(self, rules, data),
            Check::NoneOf(rules) => logical::none_of(self, rules, data),

            Check::Completeness {
                required_fields,
                threshold,
            } => quality::completeness(data, required_fields, *threshold),
            Check::Consistency(rules) => quality::consistency(data, rules),
            Check::Uniqueness { key_field } => quality::uniqueness(data, key_field.as_deref()),
            Check::Accuracy {
                reference,
                tolerance,
            } => quality::accuracy(data, reference, *tolerance),
        }
    }
}

impl RuleEvaluator for ValidatorRegistry {
    fn evaluate_entry(&self, entry: &RuleCheck, data: &Value) -> ValidationResult {
        let result = match &entry.check {
            Ok(check) => self.evaluate(check, data),
            Err(e) => {
                tracing::debug!(rule = %entry.name, error = %e, "sub-rule rejected");
                ValidationResult::fail(e.to_string())
            }
        };
        match &entry.message {
            Some(message) => result.with_message(message.clone()),
            None => result,
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`ValidatorRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    config: EngineConfig,
    predicates: PredicateTable,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            predicates: PredicateTable::with_builtins(),
        }
    }
}

impl RegistryBuilder {
    /// Replaces the engine limits.
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers one more custom predicate.
    #[must_use = "builder methods must be chained or built"]
    pub fn predicate<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        self.predicates = self.predicates.register(name, predicate);
        self
    }

    /// Replaces the whole predicate table, built-ins included.
    #[must_use = "builder methods must be chained or built"]
    pub fn predicates(mut self, predicates: PredicateTable) -> Self {
        self.predicates = predicates;
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> ValidatorRegistry {
        ValidatorRegistry {
            config: self.config,
            predicates: self.predicates,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
