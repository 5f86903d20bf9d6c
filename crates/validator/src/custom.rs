//! Named custom predicates.
//!
//! The `custom` kind never evaluates caller-supplied source. It names a
//! predicate registered ahead of time in a [`PredicateTable`]; the table
//! ships with a few built-ins and embedders add their own.
//!
//! ```
//! use assay_validator::custom::PredicateTable;
//! use serde_json::json;
//!
//! let table = PredicateTable::with_builtins().register("short_code", |v| {
//!     v.as_str()
//!         .map(|s| s.len() <= 4)
//!         .ok_or_else(|| "expected a string".to_string())
//! });
//! assert!(table.evaluate("short_code", &json!("AB1")).is_valid());
//! assert!(!table.evaluate("short_code", &json!("ABCDE")).is_valid());
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::ValidationResult;

/// A predicate over one value. `Err` carries a reason the predicate could
/// not decide, for instance a value of the wrong type.
pub type Predicate = Arc<dyn Fn(&Value) -> Result<bool, String> + Send + Sync>;

/// Predicates by name. Immutable once the registry is built.
#[derive(Clone, Default)]
pub struct PredicateTable {
    predicates: BTreeMap<String, Predicate>,
}

impl fmt::Debug for PredicateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateTable")
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PredicateTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding `non_blank`, `positive`, `negative`, `even`, `odd`
    /// and `finite`.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new()
            .register("non_blank", |v| text(v).map(|s| !s.trim().is_empty()))
            .register("positive", |v| number(v).map(|n| n > 0.0))
            .register("negative", |v| number(v).map(|n| n < 0.0))
            .register("even", |v| integer(v).map(|n| n % 2 == 0))
            .register("odd", |v| integer(v).map(|n| n % 2 != 0))
            .register("finite", |v| number(v).map(f64::is_finite))
    }

    /// Adds or replaces a predicate.
    #[must_use = "builder methods must be chained or built"]
    pub fn register<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// The predicate registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }

    /// Runs the named predicate on `data`.
    ///
    /// Unknown names, predicate errors and predicate panics all become
    /// failing results carrying the reason.
    #[must_use]
    pub fn evaluate(&self, name: &str, data: &Value) -> ValidationResult {
        let Some(predicate) = self.get(name) else {
            return ValidationResult::fail(format!("Unknown custom function '{name}'"))
                .with_detail("available_functions", self.names().collect::<Vec<_>>());
        };
        match panic::catch_unwind(AssertUnwindSafe(|| predicate(data))) {
            Ok(Ok(true)) => ValidationResult::pass().with_detail("function", name),
            Ok(Ok(false)) => ValidationResult::fail(format!("Custom validation '{name}' failed"))
                .with_detail("function", name),
            Ok(Err(reason)) => ValidationResult::fail(format!(
                "Custom validation '{name}' raised an error: {reason}"
            ))
            .with_detail("function", name),
            Err(payload) => {
                let reason = panic_text(payload.as_ref());
                tracing::warn!(function = name, %reason, "custom predicate panicked");
                ValidationResult::fail(format!("Custom validation '{name}' panicked: {reason}"))
                    .with_detail("function", name)
            }
        }
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn text(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected a string, got {value}"))
}

fn number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("number out of range: {n}")),
        other => Err(format!("expected a number, got {other}")),
    }
}

fn integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| format!("expected an integer, got {n}")),
        other => Err(format!("expected an integer, got {other}")),
    }
}
