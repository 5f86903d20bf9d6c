//! Prelude module for convenient imports.
//!
//! `use assay_validator::prelude::*;` brings in the registry, the request
//! entry point and the types needed to build rules and read results.

// ============================================================================
// FOUNDATION
// ============================================================================

pub use crate::foundation::{EngineError, EngineResult, JsonType, ValidationResult};

// ============================================================================
// RULES AND CHECKS
// ============================================================================

pub use crate::check::{Bounds, Check, LengthBounds, RuleCheck, TextMatch};
pub use crate::schema::CompiledSchema;
pub use crate::validators::constraint::CompiledPattern;
pub use crate::rule::{Category, KindDescriptor, Rule, RuleEntry, RuleKind, catalog};

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::batch::{BatchItem, BatchReport};
pub use crate::config::EngineConfig;
pub use crate::custom::PredicateTable;
pub use crate::registry::{RegistryBuilder, ValidatorRegistry};
pub use crate::request::{
    ResponseBody, ValidationRequest, ValidationResponse, handle, handle_json,
};
