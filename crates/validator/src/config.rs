//! Engine limits.
//!
//! The engine itself reads no files or environment; callers (the CLI, a
//! service) deserialize an [`EngineConfig`] from whatever source they use
//! and hand it to the registry. Every field has a default, so an empty
//! table is a valid configuration.

use serde::{Deserialize, Serialize};

/// Default cap on caller-supplied regex pattern length, in bytes.
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 1024;

/// Default cap on input text matched against a caller-supplied regex.
pub const DEFAULT_MAX_PATTERN_INPUT_LENGTH: usize = 1024 * 1024;

/// Default compiled regex program size limit.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// Default schema nesting limit.
pub const DEFAULT_MAX_SCHEMA_DEPTH: usize = 32;

/// Default batch size at which parallel execution kicks in.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 512;

/// Resource limits applied while evaluating checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Longest accepted `pattern` parameter, in bytes.
    pub max_pattern_length: usize,
    /// Longest text a `pattern` check will scan, in bytes.
    pub max_pattern_input_length: usize,
    /// Compiled size limit passed to the regex builder.
    pub regex_size_limit: usize,
    /// Deepest nesting a schema may describe.
    pub max_schema_depth: usize,
    /// Batches at least this long run in parallel when the `parallel`
    /// feature is enabled.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            max_pattern_input_length: DEFAULT_MAX_PATTERN_INPUT_LENGTH,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            max_schema_depth: DEFAULT_MAX_SCHEMA_DEPTH,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Sets the schema nesting limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_schema_depth(mut self, depth: usize) -> Self {
        self.max_schema_depth = depth;
        self
    }

    /// Sets the regex pattern length limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_pattern_length(mut self, length: usize) -> Self {
        self.max_pattern_length = length;
        self
    }

    /// Sets the regex input length limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_pattern_input_length(mut self, length: usize) -> Self {
        self.max_pattern_input_length = length;
        self
    }

    /// Sets the parallel batch threshold.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_table_is_default() {
        let config: EngineConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: EngineConfig =
            serde_json::from_value(json!({"max_schema_depth": 4})).unwrap();
        assert_eq!(config.max_schema_depth, 4);
        assert_eq!(config.max_pattern_length, DEFAULT_MAX_PATTERN_LENGTH);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_value::<EngineConfig>(json!({"max_depth": 4})).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }
}
