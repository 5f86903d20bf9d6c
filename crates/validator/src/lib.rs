//! # assay-validator
//!
//! A rule-based validation engine for JSON values.
//!
//! A request names one of the catalog's kinds, carries the value to check and
//! the kind's parameters, and gets back a [`ValidationResult`]: pass or fail,
//! a message on failure, and a map of diagnostic details.
//!
//! ## Quick Start
//!
//! ```
//! use assay_validator::prelude::*;
//! use serde_json::json;
//!
//! let registry = ValidatorRegistry::new();
//! let response = handle_json(&registry, json!({
//!     "validation_type": "all",
//!     "data": "ab",
//!     "rules": [{"type": "is_string"}, {"type": "min_length", "value": 3}]
//! }));
//! assert!(response.is_success());
//! assert!(!response.result().unwrap().is_valid());
//! ```
//!
//! ## Layout
//!
//! - [`rule`] and [`params`]: the kind catalog and parameter normalization
//! - [`check`]: kinds with typed parameters
//! - [`validators`]: the individual checks
//! - [`combinators`] and [`schema`]: composition, conditions, dependencies
//!   and recursive schemas
//! - [`registry`]: dispatch, with the engine limits and custom predicates
//! - [`batch`] and [`request`]: batch execution and the request entry point
//!
//! [`ValidationResult`]: foundation::ValidationResult

#[macro_use]
mod macros;

pub mod batch;
pub mod check;
pub mod combinators;
pub mod config;
pub mod custom;
pub mod foundation;
pub mod params;
pub mod prelude;
pub mod registry;
pub mod request;
pub mod rule;
pub mod schema;
pub mod validators;

pub use foundation::{EngineError, EngineResult, JsonType, ValidationResult};
pub use registry::ValidatorRegistry;
pub use request::{ValidationRequest, ValidationResponse, handle, handle_json};
pub use rule::{Rule, RuleKind};
