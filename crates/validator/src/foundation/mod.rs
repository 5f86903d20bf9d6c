//! Building blocks shared by every part of the engine.
//!
//! - [`ValidationResult`]: the universal return value of a check
//! - [`EngineError`]: request-level errors (missing kind, bad parameters)
//! - [`JsonType`]: the type vocabulary used by type, schema and property checks
//! - [`value`]: equality, ordering and canonical keys over JSON values

pub mod error;
pub mod result;
pub mod types;
pub mod value;

pub use error::{EngineError, EngineResult};
pub use result::ValidationResult;
pub use types::{JsonType, UnknownType};
