//! JSON type vocabulary shared by the type predicates, the schema validator
//! and the object property validators.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// A JSON value type as seen by the engine.
///
/// Numbers are split into integers and floats the way a dynamic language
/// would see them: `3` is an integer, `3.0` and `3.5` are floats. Booleans are
/// never numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    /// Text.
    String,
    /// Any number (matches integers and floats).
    Number,
    /// Integral number.
    Integer,
    /// Number with a floating point representation.
    Float,
    /// `true` / `false`.
    Boolean,
    /// Ordered list.
    Array,
    /// Key/value map.
    Object,
    /// `null`.
    Null,
}

impl JsonType {
    /// Every type, in discovery order.
    pub const ALL: [Self; 8] = [
        Self::String,
        Self::Number,
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Array,
        Self::Object,
        Self::Null,
    ];

    /// The most specific type of `value`.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether `value` belongs to this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            other => Self::of(value) == other,
        }
    }

    /// Lower-case wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type '{0}', expected one of: {names}", names = type_names())]
pub struct UnknownType(pub String);

fn type_names() -> String {
    JsonType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for JsonType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Ok(Self::String),
            "number" | "numeric" => Ok(Self::Number),
            "integer" | "int" => Ok(Self::Integer),
            "float" | "double" => Ok(Self::Float),
            "boolean" | "bool" => Ok(Self::Boolean),
            "array" | "list" => Ok(Self::Array),
            "object" | "dict" | "map" => Ok(Self::Object),
            "null" | "none" => Ok(Self::Null),
            _ => Err(UnknownType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_split_into_integer_and_float() {
        assert_eq!(JsonType::of(&json!(3)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(3.5)), JsonType::Float);
        assert!(JsonType::Number.matches(&json!(3)));
        assert!(JsonType::Number.matches(&json!(3.5)));
    }

    #[test]
    fn booleans_are_not_numbers() {
        assert!(!JsonType::Number.matches(&json!(true)));
        assert!(!JsonType::Integer.matches(&json!(false)));
        assert!(JsonType::Boolean.matches(&json!(true)));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("int".parse::<JsonType>(), Ok(JsonType::Integer));
        assert_eq!("Dict".parse::<JsonType>(), Ok(JsonType::Object));
        assert!("tuple".parse::<JsonType>().is_err());
    }

    #[test]
    fn unknown_type_lists_the_known_names() {
        let err = "tuple".parse::<JsonType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown type 'tuple', expected one of: \
             string, number, integer, float, boolean, array, object, null"
        );
        assert!(JsonType::ALL.iter().all(|t| t.as_str().parse::<JsonType>() == Ok(*t)));
    }
}
