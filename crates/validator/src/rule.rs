//! The rule catalog: kinds, categories, parameter specs and rule values.
//!
//! [`RuleKind`] is a closed enum; everything a discovery UI needs (tag,
//! category, summary, parameters) is derived from the single table below.
//! A [`Rule`] pairs a kind with its raw parameter payload and an optional
//! message override, and only exists while a composite check runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::foundation::{EngineError, EngineResult};

// ============================================================================
// CATEGORY
// ============================================================================

/// Discovery grouping of rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// JSON type predicates.
    Type,
    /// Text format predicates.
    Format,
    /// Presence, bound, length, pattern and membership constraints.
    Constraint,
    /// Substring and case predicates.
    String,
    /// Array predicates.
    Array,
    /// Object property predicates.
    Object,
    /// Comparisons against a reference value.
    Comparison,
    /// Schema, custom, conditional, dependency and logical operators.
    Composite,
    /// Data-quality measures.
    Quality,
}

impl Category {
    /// Every category, in discovery order.
    pub const ALL: [Self; 9] = [
        Self::Type,
        Self::Format,
        Self::Constraint,
        Self::String,
        Self::Array,
        Self::Object,
        Self::Comparison,
        Self::Composite,
        Self::Quality,
    ];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Format => "format",
            Self::Constraint => "constraint",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Comparison => "comparison",
            Self::Composite => "composite",
            Self::Quality => "quality",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

// ============================================================================
// PARAMETER SPECS
// ============================================================================

/// Expected shape of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Any JSON value.
    Any,
    /// A number.
    Number,
    /// A non-negative integer.
    Integer,
    /// A string.
    String,
    /// A boolean.
    Boolean,
    /// A list.
    List,
    /// An object.
    Map,
}

/// Declaration of one named parameter of a rule kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    /// Canonical name, as used in requests.
    pub name: &'static str,
    /// Expected value shape.
    pub shape: Shape,
    /// Whether the kind cannot run without it.
    pub required: bool,
    /// Alternative names accepted in named payloads.
    #[serde(skip_serializing_if = "no_aliases")]
    pub aliases: &'static [&'static str],
}

fn no_aliases(aliases: &&'static [&'static str]) -> bool {
    aliases.is_empty()
}

impl ParamSpec {
    /// A parameter the kind cannot run without.
    #[must_use]
    pub const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
            aliases: &[],
        }
    }

    /// A parameter with a default.
    #[must_use]
    pub const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
            aliases: &[],
        }
    }

    /// Adds accepted alternative names.
    #[must_use]
    pub const fn alias(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Whether `key` names this parameter.
    #[must_use]
    pub fn answers_to(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }
}

// ============================================================================
// RULE KINDS
// ============================================================================

const DATE_FORMAT: ParamSpec = ParamSpec::optional("format", Shape::String);
const CASE_SENSITIVE: ParamSpec = ParamSpec::optional("case_sensitive", Shape::Boolean);
const COMPARE_VALUE: ParamSpec =
    ParamSpec::required("compare_value", Shape::Any).alias(&["value", "expected"]);
const MIN_VALUE: ParamSpec = ParamSpec::required("min_value", Shape::Number).alias(&["min"]);
const MAX_VALUE: ParamSpec = ParamSpec::required("max_value", Shape::Number).alias(&["max"]);
const RULES: ParamSpec = ParamSpec::required("rules", Shape::List);

rule_kinds! {
    // Type predicates
    IsString => "is_string", Type, "Value is a string", [];
    IsNumber => "is_number", Type, "Value is a number (booleans excluded)", [];
    IsInteger => "is_integer", Type, "Value is an integer (booleans excluded)", [];
    IsFloat => "is_float", Type, "Value is a floating point number (booleans excluded)", [];
    IsBoolean => "is_boolean", Type, "Value is a boolean", [];
    IsArray => "is_array", Type, "Value is an array", [];
    IsObject => "is_object", Type, "Value is an object", [];
    IsNull => "is_null", Type, "Value is null", [];
    IsNotNull => "is_not_null", Type, "Value is not null", [];

    // Format predicates
    Email => "email", Format, "String is an email address", [];
    Url => "url", Format, "String is an http(s) or ftp(s) URL with a host", [];
    Uuid => "uuid", Format, "String is a UUID", [];
    Date => "date", Format, "String is a date in the given or a common format", [DATE_FORMAT];
    Time => "time", Format, "String is a time of day in the given or a common format", [DATE_FORMAT];
    Datetime => "datetime", Format, "String is a date and time in the given or a common format", [DATE_FORMAT];
    Ipv4 => "ipv4", Format, "String is an IPv4 address", [];
    Ipv6 => "ipv6", Format, "String is an IPv6 address", [];
    IpAddress => "ip_address", Format, "String is an IPv4 or IPv6 address", [];
    MacAddress => "mac_address", Format, "String is a MAC address", [];
    Phone => "phone", Format, "String is a phone number with 7 to 15 digits", [];
    CreditCard => "credit_card", Format, "String is a card number passing the Luhn check", [];
    PostalCode => "postal_code", Format, "String is a postal code for the country (US, UK, CA)", [
        ParamSpec::optional("country", Shape::String).alias(&["country_code"]),
    ];
    Alpha => "alpha", Format, "String has only alphabetic characters", [];
    Alphanumeric => "alphanumeric", Format, "String has only alphanumeric characters", [];
    Numeric => "numeric", Format, "String has only numeric characters", [];
    Hex => "hex", Format, "String is hexadecimal, optionally 0x-prefixed", [];
    Base64 => "base64", Format, "String is standard base64", [];
    Json => "json", Format, "Text parses as JSON, or structure serializes to JSON", [];
    Xml => "xml", Format, "Text is well-formed XML", [];

    // Constraint predicates
    Required => "required", Constraint, "Value is present and not empty", [];
    NotEmpty => "not_empty", Constraint, "String, array or object is not empty", [];
    MinValue => "min_value", Constraint, "Number is at least the minimum", [MIN_VALUE];
    MaxValue => "max_value", Constraint, "Number is at most the maximum", [MAX_VALUE];
    Range => "range", Constraint, "Number lies within inclusive bounds", [MIN_VALUE, MAX_VALUE];
    MinLength => "min_length", Constraint, "Length is at least the minimum", [
        ParamSpec::required("min_length", Shape::Integer).alias(&["min"]),
    ];
    MaxLength => "max_length", Constraint, "Length is at most the maximum", [
        ParamSpec::required("max_length", Shape::Integer).alias(&["max"]),
    ];
    Length => "length", Constraint, "Length lies within optional bounds", [
        ParamSpec::optional("min_length", Shape::Integer).alias(&["min"]),
        ParamSpec::optional("max_length", Shape::Integer).alias(&["max"]),
    ];
    ExactLength => "exact_length", Constraint, "Length equals the given value", [
        ParamSpec::required("length", Shape::Integer).alias(&["exact"]),
    ];
    Pattern => "pattern", Constraint, "String contains a match for the regular expression", [
        ParamSpec::required("pattern", Shape::String).alias(&["regex"]),
    ];
    Enum => "enum", Constraint, "Value is one of the allowed values", [
        ParamSpec::required("allowed_values", Shape::List).alias(&["values"]),
    ];
    NotIn => "not_in", Constraint, "Value is none of the forbidden values", [
        ParamSpec::required("forbidden_values", Shape::List).alias(&["values"]),
    ];

    // String predicates
    StartsWith => "starts_with", String, "String starts with the prefix", [
        ParamSpec::required("prefix", Shape::String),
        CASE_SENSITIVE,
    ];
    EndsWith => "ends_with", String, "String ends with the suffix", [
        ParamSpec::required("suffix", Shape::String),
        CASE_SENSITIVE,
    ];
    Contains => "contains", String, "String contains the substring", [
        ParamSpec::required("substring", Shape::String),
        CASE_SENSITIVE,
    ];
    NotContains => "not_contains", String, "String does not contain the substring", [
        ParamSpec::required("substring", Shape::String),
        CASE_SENSITIVE,
    ];
    Lowercase => "lowercase", String, "String has no upper-case characters", [];
    Uppercase => "uppercase", String, "String has no lower-case characters", [];

    // Array predicates
    ArrayMinLength => "array_min_length", Array, "Array has at least the given number of items", [
        ParamSpec::required("min_items", Shape::Integer).alias(&["min", "min_length"]),
    ];
    ArrayMaxLength => "array_max_length", Array, "Array has at most the given number of items", [
        ParamSpec::required("max_items", Shape::Integer).alias(&["max", "max_length"]),
    ];
    ArrayLength => "array_length", Array, "Array item count lies within optional bounds", [
        ParamSpec::optional("min_items", Shape::Integer).alias(&["min", "min_length"]),
        ParamSpec::optional("max_items", Shape::Integer).alias(&["max", "max_length"]),
    ];
    ArrayUnique => "array_unique", Array, "Array items are pairwise distinct", [];
    ArrayContains => "array_contains", Array, "Array contains the item", [
        ParamSpec::required("item", Shape::Any).alias(&["value"]),
    ];
    ArrayItemType => "array_item_type", Array, "Every array item has the given type", [
        ParamSpec::required("item_type", Shape::String).alias(&["type"]),
    ];

    // Object predicates
    HasProperty => "has_property", Object, "Object has the property", [
        ParamSpec::required("property", Shape::String).alias(&["key", "property_name"]),
    ];
    HasProperties => "has_properties", Object, "Object has every listed property", [
        ParamSpec::required("properties", Shape::List).alias(&["keys", "property_names"]),
    ];
    PropertyType => "property_type", Object, "Object property has the given type", [
        ParamSpec::required("property", Shape::String).alias(&["key", "property_name"]),
        ParamSpec::required("expected_type", Shape::String).alias(&["type"]),
    ];
    PropertyValue => "property_value", Object, "Object property equals the given value", [
        ParamSpec::required("property", Shape::String).alias(&["key", "property_name"]),
        ParamSpec::required("expected", Shape::Any).alias(&["value", "expected_value"]),
    ];

    // Comparison predicates
    Equals => "equals", Comparison, "Value equals the reference", [COMPARE_VALUE];
    NotEquals => "not_equals", Comparison, "Value differs from the reference", [COMPARE_VALUE];
    GreaterThan => "greater_than", Comparison, "Value is greater than the reference", [COMPARE_VALUE];
    GreaterThanOrEqual => "greater_than_or_equal", Comparison, "Value is at least the reference", [COMPARE_VALUE];
    LessThan => "less_than", Comparison, "Value is less than the reference", [COMPARE_VALUE];
    LessThanOrEqual => "less_than_or_equal", Comparison, "Value is at most the reference", [COMPARE_VALUE];
    Between => "between", Comparison, "Number lies strictly between the bounds", [MIN_VALUE, MAX_VALUE];

    // Composite predicates
    Schema => "schema", Composite, "Object satisfies a schema of required keys and property constraints", [
        ParamSpec::required("schema", Shape::Map),
    ];
    Custom => "custom", Composite, "Value satisfies a registered named predicate", [
        ParamSpec::required("function", Shape::String).alias(&["predicate", "name"]),
    ];
    Conditional => "conditional", Composite, "Applies then-rules or else-rules depending on a condition", [
        ParamSpec::required("condition", Shape::Map),
        ParamSpec::optional("then_rules", Shape::List).alias(&["then"]),
        ParamSpec::optional("else_rules", Shape::List).alias(&["else"]),
    ];
    Dependency => "dependency", Composite, "Present fields bring their companion fields", [
        ParamSpec::required("dependencies", Shape::Map),
    ];
    All => "all", Composite, "Every rule passes", [RULES];
    Any => "any", Composite, "At least one rule passes", [RULES];
    NoneOf => "none", Composite, "No rule passes", [RULES];

    // Data-quality measures
    Completeness => "completeness", Quality, "Share of required fields present meets the threshold", [
        ParamSpec::required("required_fields", Shape::List).alias(&["fields"]),
        ParamSpec::optional("threshold", Shape::Number),
    ];
    Consistency => "consistency", Quality, "Pairwise field relations hold", [
        ParamSpec::required("consistency_rules", Shape::List).alias(&["rules"]),
    ];
    Uniqueness => "uniqueness", Quality, "List items (or their key field) are unique", [
        ParamSpec::optional("key_field", Shape::String).alias(&["key"]),
    ];
    Accuracy => "accuracy", Quality, "Value matches the reference within tolerance", [
        ParamSpec::required("reference", Shape::Any).alias(&["reference_value"]),
        ParamSpec::optional("tolerance", Shape::Number),
    ];
}

impl RuleKind {
    /// Looks a kind up by wire tag (case-insensitive, a few aliases).
    #[must_use]
    pub fn lookup(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        Self::from_tag(&tag).or(match tag.as_str() {
            "in" => Some(Self::Enum),
            "regex" => Some(Self::Pattern),
            "ip" => Some(Self::IpAddress),
            "and" => Some(Self::All),
            "or" => Some(Self::Any),
            "date_time" => Some(Self::Datetime),
            _ => None,
        })
    }

    /// Discovery entry for this kind.
    #[must_use]
    pub fn descriptor(self) -> KindDescriptor {
        KindDescriptor {
            kind: self,
            category: self.category(),
            summary: self.summary(),
            params: self.params(),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| EngineError::UnknownKind(s.to_string()))
    }
}

impl Serialize for RuleKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything a caller needs to present one kind in a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindDescriptor {
    /// The kind's wire tag.
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Discovery grouping.
    pub category: Category,
    /// One-line description.
    pub summary: &'static str,
    /// Declared parameters.
    pub params: &'static [ParamSpec],
}

/// Descriptors for the whole catalog.
#[must_use]
pub fn catalog() -> Vec<KindDescriptor> {
    RuleKind::ALL.iter().map(|k| k.descriptor()).collect()
}

// ============================================================================
// RULE
// ============================================================================

/// One entry of a composite rule list.
///
/// Wire form: `{"type": "<kind>", "value": <param payload>, "message":
/// "<override>"}`; a bare string `"<kind>"` is shorthand for a rule without
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// What to check.
    pub kind: RuleKind,
    /// Raw parameter payload (scalar, list or map); `None` when the rule
    /// gives none. An explicit `null` is `Some(Value::Null)`.
    pub value: Option<Value>,
    /// Replaces the failure message when the rule fails.
    pub message: Option<String>,
}

/// A rule list entry that may have failed to parse.
///
/// Kept per entry so that one bad rule fails on its own instead of
/// invalidating its siblings.
pub type RuleEntry = EngineResult<Rule>;

impl Rule {
    /// A rule with the given parameter payload.
    pub fn new(kind: RuleKind, value: impl Into<Value>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            message: None,
        }
    }

    /// A rule without parameters.
    #[must_use]
    pub fn bare(kind: RuleKind) -> Self {
        Self {
            kind,
            value: None,
            message: None,
        }
    }

    /// Sets the failure message override.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Reads one rule from its wire form.
    pub fn from_value(raw: &Value) -> EngineResult<Self> {
        match raw {
            Value::String(tag) => Ok(Self::bare(tag.parse()?)),
            Value::Object(map) => {
                let tag = ["type", "kind", "validation_type"]
                    .iter()
                    .find_map(|k| map.get(*k))
                    .ok_or(EngineError::MissingKind)?;
                let tag = tag.as_str().ok_or_else(|| {
                    EngineError::InvalidRequest(format!("rule type must be a string, got {tag}"))
                })?;
                let value = map.get("value").or_else(|| map.get("params")).cloned();
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Ok(Self {
                    kind: tag.parse()?,
                    value,
                    message,
                })
            }
            other => Err(EngineError::InvalidRequest(format!(
                "rule must be an object or a type name, got {other}"
            ))),
        }
    }

    /// Reads a rule list; non-list input is a single bad entry.
    #[must_use]
    pub fn list_from_value(raw: &Value) -> Vec<RuleEntry> {
        match raw {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            Value::Null => Vec::new(),
            other => vec![Err(EngineError::InvalidRequest(format!(
                "rules must be a list, got {other}"
            )))],
        }
    }

    /// Wire form of the rule.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.kind.as_str()));
        if let Some(value) = &self.value {
            map.insert("value".into(), value.clone());
        }
        if let Some(message) = &self.message {
            map.insert("message".into(), Value::from(message.as_str()));
        }
        Value::Object(map)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn tags_round_trip_through_lookup() {
        for kind in RuleKind::ALL {
            assert_eq!(RuleKind::lookup(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn tags_are_unique() {
        let tags: HashSet<_> = RuleKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(tags.len(), RuleKind::ALL.len());
        assert!(RuleKind::ALL.len() >= 70);
    }

    #[test]
    fn lookup_is_case_insensitive_and_knows_aliases() {
        assert_eq!(RuleKind::lookup(" Email "), Some(RuleKind::Email));
        assert_eq!(RuleKind::lookup("in"), Some(RuleKind::Enum));
        assert_eq!(RuleKind::lookup("none"), Some(RuleKind::NoneOf));
        assert_eq!(RuleKind::lookup("nope"), None);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert_eq!(
            "is_purple".parse::<RuleKind>(),
            Err(EngineError::UnknownKind("is_purple".into()))
        );
    }

    #[test]
    fn descriptors_serialize_for_discovery() {
        let range = serde_json::to_value(RuleKind::Range.descriptor()).unwrap();
        assert_eq!(range["type"], json!("range"));
        assert_eq!(range["category"], json!("constraint"));
        assert_eq!(range["params"][0]["name"], json!("min_value"));
        assert_eq!(range["params"][0]["aliases"], json!(["min"]));
        assert_eq!(catalog().len(), RuleKind::ALL.len());
    }

    #[test]
    fn rule_from_object() {
        let rule = Rule::from_value(&json!({"type": "min_length", "value": 3, "message": "short"}))
            .unwrap();
        assert_eq!(rule, Rule::new(RuleKind::MinLength, 3).with_message("short"));
        assert_eq!(rule.to_value()["type"], json!("min_length"));
    }

    #[test]
    fn explicit_null_value_is_kept() {
        let rule = Rule::from_value(&json!({"type": "equals", "value": null})).unwrap();
        assert_eq!(rule.value, Some(Value::Null));
        let rule = Rule::from_value(&json!({"type": "equals"})).unwrap();
        assert_eq!(rule.value, None);
        assert_eq!(rule.to_value(), json!({"type": "equals"}));
    }

    #[test]
    fn rule_from_bare_tag() {
        assert_eq!(
            Rule::from_value(&json!("is_string")).unwrap(),
            Rule::bare(RuleKind::IsString)
        );
    }

    #[test]
    fn rule_list_keeps_bad_entries_in_place() {
        let entries = Rule::list_from_value(&json!(["is_string", {"value": 1}, {"type": "zzz"}]));
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_ok());
        assert_eq!(entries[1], Err(EngineError::MissingKind));
        assert_eq!(entries[2], Err(EngineError::UnknownKind("zzz".into())));
    }
}
