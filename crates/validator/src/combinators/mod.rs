//! Composition over rule lists.
//!
//! - [`logical`]: ALL / ANY / NONE over a list of rules applied to one value
//! - [`conditional`]: pick a rule list by testing a [`Condition`] on the value
//! - [`dependency`]: fields that require companion fields
//!
//! The combinators never dispatch rules themselves. They are handed a
//! [`RuleEvaluator`] (in practice the
//! [`ValidatorRegistry`](crate::registry::ValidatorRegistry)) and only decide
//! how sub-results aggregate.

use serde_json::Value;

use crate::check::RuleCheck;
use crate::foundation::ValidationResult;

pub mod conditional;
pub mod dependency;
pub mod logical;

pub use conditional::{Condition, ConditionTest, conditional};
pub use dependency::dependency;
pub use logical::{all, any, none_of};

/// Evaluates one entry of a rule list against a value.
///
/// Entries that failed to build (unknown kind, malformed parameters) must
/// come back as failing results rather than errors, so a bad sub-rule never
/// aborts the surrounding composite.
pub trait RuleEvaluator {
    /// Evaluates `entry` against `data`.
    fn evaluate_entry(&self, entry: &RuleCheck, data: &Value) -> ValidationResult;
}
