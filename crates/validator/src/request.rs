//! The request entry point.
//!
//! A request names a kind, carries the value to check and the kind's
//! parameters by name:
//!
//! ```json
//! {"validation_type": "range", "data": 5, "min_value": 1, "max_value": 10}
//! ```
//!
//! With `data_list` present the check runs as a batch. Every outcome,
//! including a malformed request, is a [`ValidationResponse`]; nothing
//! panics out of [`handle`] or [`handle_json`].

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::batch::BatchReport;
use crate::custom::panic_text;
use crate::foundation::{EngineError, EngineResult, ValidationResult};
use crate::registry::ValidatorRegistry;
use crate::rule::RuleKind;

// ============================================================================
// REQUEST
// ============================================================================

/// One validation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Kind tag, e.g. `"email"`. Also accepted as `type`.
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub validation_type: Option<String>,
    /// Value to validate.
    #[serde(default)]
    pub data: Value,
    /// Items to validate as a batch instead of `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_list: Option<Vec<Value>>,
    /// Kind-specific parameters by name.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ValidationRequest {
    /// A single-value request for `kind`.
    #[must_use]
    pub fn new(kind: RuleKind, data: impl Into<Value>) -> Self {
        Self {
            validation_type: Some(kind.as_str().to_string()),
            data: data.into(),
            ..Self::default()
        }
    }

    /// A batch request for `kind`.
    #[must_use]
    pub fn batch(kind: RuleKind, items: Vec<Value>) -> Self {
        Self {
            validation_type: Some(kind.as_str().to_string()),
            data_list: Some(items),
            ..Self::default()
        }
    }

    /// Adds a named parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// Outcome of a request.
///
/// Serializes as `{"status": "success", "result": {...}}` or
/// `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResponse {
    /// The check ran; `result` says whether the value passed.
    Success {
        /// Single result or batch report.
        result: ResponseBody,
    },
    /// The request could not be evaluated.
    Error {
        /// What was wrong with the request.
        message: String,
    },
}

/// Payload of a successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// One value was validated.
    Single(ValidationResult),
    /// A `data_list` was validated.
    Batch(BatchReport),
}

impl ResponseBody {
    /// Whether the value, or every batch item, passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Single(result) => result.is_valid(),
            Self::Batch(report) => report.summary().is_valid(),
        }
    }
}

impl ValidationResponse {
    /// An error response for `error`.
    #[must_use]
    pub fn error(error: &EngineError) -> Self {
        Self::Error {
            message: error.to_string(),
        }
    }

    /// `true` for `status: success`, whatever the result.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The result body of a successful response.
    #[must_use]
    pub fn result(&self) -> Option<&ResponseBody> {
        match self {
            Self::Success { result } => Some(result),
            Self::Error { .. } => None,
        }
    }

    /// Wire form.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({"status": "error", "message": format!("unserializable response: {e}")})
        })
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Evaluates a request.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(kind = request.validation_type.as_deref().unwrap_or(""))
)]
#[must_use]
pub fn handle(registry: &ValidatorRegistry, request: &ValidationRequest) -> ValidationResponse {
    match dispatch(registry, request) {
        Ok(result) => {
            tracing::debug!(valid = result.is_valid(), "request handled");
            ValidationResponse::Success { result }
        }
        Err(e) => {
            tracing::debug!(error = %e, "request rejected");
            ValidationResponse::error(&e)
        }
    }
}

/// Evaluates a request given as raw JSON. A body that does not deserialize
/// is an error response.
#[must_use]
pub fn handle_json(registry: &ValidatorRegistry, raw: Value) -> ValidationResponse {
    match serde_json::from_value::<ValidationRequest>(raw) {
        Ok(request) => handle(registry, &request),
        Err(e) => ValidationResponse::error(&EngineError::InvalidRequest(e.to_string())),
    }
}

fn dispatch(registry: &ValidatorRegistry, request: &ValidationRequest) -> EngineResult<ResponseBody> {
    let tag = request
        .validation_type
        .as_deref()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .ok_or(EngineError::MissingKind)?;
    let kind: RuleKind = tag.parse()?;
    let check = registry.build_check(kind, &request.params)?;

    if let Some(items) = &request.data_list {
        return Ok(ResponseBody::Batch(registry.run_batch(&check, items)));
    }

    panic::catch_unwind(AssertUnwindSafe(|| registry.evaluate(&check, &request.data)))
        .map(ResponseBody::Single)
        .map_err(|payload| {
            let reason = panic_text(payload.as_ref());
            tracing::warn!(%kind, %reason, "validator panicked");
            EngineError::InvalidRequest(format!("internal error in '{kind}': {reason}"))
        })
}

// ============================================================================
// TESTS
// ============================================================================
