//! Request-level errors.
//!
//! These are raised while turning a request or a rule definition into a
//! typed check. At the entry point they become a `status: error` response;
//! inside composite rules they degrade to a failing sub-result.

use crate::rule::RuleKind;

/// Error raised before any validator runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The request or rule did not name a validation kind.
    #[error("validation type is required")]
    MissingKind,

    /// The named kind is not part of the catalog.
    #[error("unknown validation type: {0}")]
    UnknownKind(String),

    /// A required parameter is absent.
    #[error("{kind}: missing required parameter '{param}'")]
    MissingParameter {
        /// Kind being configured.
        kind: RuleKind,
        /// Canonical parameter name.
        param: &'static str,
    },

    /// A parameter is present but has the wrong shape or value.
    #[error("{kind}: invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// Kind being configured.
        kind: RuleKind,
        /// Canonical parameter name.
        param: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// The request itself could not be read.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParameter`].
    pub fn invalid(kind: RuleKind, param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            kind,
            param,
            reason: reason.into(),
        }
    }
}

/// Result alias for request-level operations.
pub type EngineResult<T> = Result<T, EngineError>;
