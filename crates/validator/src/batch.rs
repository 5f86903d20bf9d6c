//! Batch execution.
//!
//! One check runs over an ordered item list. Every item gets exactly one
//! result, even when validating it panics, and the report keeps input
//! order. With the `parallel` feature, batches of at least
//! [`EngineConfig::parallel_threshold`](crate::config::EngineConfig) items
//! are mapped on the rayon pool.

use std::panic::{self, AssertUnwindSafe};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::check::Check;
use crate::custom::panic_text;
use crate::foundation::ValidationResult;
use crate::foundation::value::number_value;
use crate::registry::ValidatorRegistry;

/// Result for one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    /// Position in the input list.
    pub index: usize,
    /// The item itself.
    pub data: Value,
    /// Outcome for this item.
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Per-item results plus aggregate counts.
///
/// Serializes as the summary result (`valid`, `message`, `details`) with
/// `results`, `successful`, `failed`, `total` and `success_rate` alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    #[serde(flatten)]
    summary: ValidationResult,
    results: Vec<BatchItem>,
    successful: usize,
    failed: usize,
    total: usize,
    success_rate: f64,
}

impl BatchReport {
    /// Aggregates item results that are already in index order.
    #[must_use]
    pub fn from_items(results: Vec<BatchItem>) -> Self {
        let total = results.len();
        let successful = results.iter().filter(|item| item.result.is_valid()).count();
        let failed = total - successful;
        #[allow(clippy::cast_precision_loss)]
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };

        let summary = ValidationResult::check(failed == 0, || {
            format!("{failed} of {total} items failed validation")
        })
        .with_detail("successful", successful)
        .with_detail("failed", failed)
        .with_detail("total", total)
        .with_detail("success_rate", number_value(success_rate));

        Self {
            summary,
            results,
            successful,
            failed,
            total,
            success_rate,
        }
    }

    /// Valid iff every item passed.
    #[must_use]
    pub fn summary(&self) -> &ValidationResult {
        &self.summary
    }

    /// Item results in input order.
    #[must_use]
    pub fn results(&self) -> &[BatchItem] {
        &self.results
    }

    /// Items that passed.
    #[must_use]
    pub fn successful(&self) -> usize {
        self.successful
    }

    /// Items that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Number of items.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// `successful / total`, `0.0` for an empty batch.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

/// Validates one item, turning a panic into a failing result.
fn validate_item(
    registry: &ValidatorRegistry,
    check: &Check,
    index: usize,
    data: &Value,
) -> BatchItem {
    let result = panic::catch_unwind(AssertUnwindSafe(|| registry.evaluate(check, data)))
        .unwrap_or_else(|payload| {
            let reason = panic_text(payload.as_ref());
            tracing::warn!(index, %reason, "batch item panicked during validation");
            ValidationResult::fail(format!(
                "Internal error while validating item {index}: {reason}"
            ))
            .with_detail("internal_error", true)
        });
    BatchItem {
        index,
        data: data.clone(),
        result,
    }
}

/// Runs `check` over `items`.
#[tracing::instrument(level = "debug", skip_all, fields(items = items.len()))]
pub fn run(registry: &ValidatorRegistry, check: &Check, items: &[Value]) -> BatchReport {
    #[cfg(feature = "parallel")]
    {
        if items.len() >= registry.config().parallel_threshold {
            tracing::debug!("validating batch in parallel");
            let results = items
                .par_iter()
                .enumerate()
                .map(|(index, data)| validate_item(registry, check, index, data))
                .collect();
            return BatchReport::from_items(results);
        }
    }

    let results = items
        .iter()
        .enumerate()
        .map(|(index, data)| validate_item(registry, check, index, data))
        .collect();
    BatchReport::from_items(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn counts_and_order() {
        let registry = ValidatorRegistry::new();
        let report = run(&registry, &Check::IsNumber, &[json!(1), json!("x"), json!(3)]);
        assert_eq!(report.successful(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total(), 3);
        assert!((report.success_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert!(!report.results()[1].result.is_valid());
        let indices: Vec<usize> = report.results().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(!report.summary().is_valid());
    }

    #[test]
    fn empty_batch_has_zero_rate() {
        let report = run(&ValidatorRegistry::new(), &Check::IsString, &[]);
        assert_eq!(report.total(), 0);
        assert_eq!(report.success_rate(), 0.0);
        assert!(report.summary().is_valid());
    }

    #[test]
    fn wire_form() {
        let report = run(&ValidatorRegistry::new(), &Check::IsString, &[json!("a")]);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "valid": true,
                "message": null,
                "details": {"successful": 1, "failed": 0, "total": 1, "success_rate": 1.0},
                "results": [
                    {"index": 0, "data": "a", "valid": true, "message": null,
                     "details": {"type": "string"}}
                ],
                "successful": 1,
                "failed": 0,
                "total": 1,
                "success_rate": 1.0
            })
        );
    }

    #[test]
    fn panicking_items_are_recorded() {
        let registry = ValidatorRegistry::builder()
            .predicate("explodes_on_null", |v| {
                assert!(!v.is_null(), "null is not allowed here");
                Ok(true)
            })
            .build();
        let check = Check::Custom("explodes_on_null".into());
        let report = run(&registry, &check, &[json!(1), json!(null)]);
        assert_eq!(report.successful(), 1);
        assert_eq!(report.failed(), 1);
        assert!(
            report.results()[1]
                .result
                .message()
                .unwrap()
                .contains("null is not allowed here")
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_batches_keep_input_order() {
        use crate::config::EngineConfig;

        let registry = ValidatorRegistry::builder()
            .config(EngineConfig::default().with_parallel_threshold(1))
            .predicate("explodes_on_null", |v| {
                assert!(!v.is_null(), "null is not allowed here");
                Ok(v.is_number())
            })
            .build();
        let items: Vec<Value> = (0..500)
            .map(|i| match i % 5 {
                0 => json!(null),
                1 => json!("x"),
                _ => json!(i),
            })
            .collect();
        let report = run(&registry, &Check::Custom("explodes_on_null".into()), &items);

        assert_eq!(report.total(), 500);
        assert_eq!(report.successful(), 300);
        assert_eq!(report.failed(), 200);
        let indices: Vec<usize> = report.results().iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..500).collect::<Vec<_>>());
        for (item, input) in report.results().iter().zip(&items) {
            assert_eq!(&item.data, input);
            assert_eq!(item.result.is_valid(), input.is_number());
        }
        assert!(
            report.results()[0]
                .result
                .message()
                .unwrap()
                .contains("null is not allowed here")
        );
    }
}
