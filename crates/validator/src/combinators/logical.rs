//! ALL, ANY and NONE over a rule list.
//!
//! ALL short-circuits on the first failure and ANY on the first success;
//! NONE evaluates every rule so it can name each violation.

use serde_json::{Value, json};

use crate::check::RuleCheck;
use crate::combinators::RuleEvaluator;
use crate::foundation::ValidationResult;

/// Valid iff every rule passes. An empty list is valid.
///
/// The first failure's message (already overridden by the rule's own
/// `message`, if any) becomes the composite's message.
pub fn all(evaluator: &impl RuleEvaluator, rules: &[RuleCheck], data: &Value) -> ValidationResult {
    for (index, entry) in rules.iter().enumerate() {
        let result = evaluator.evaluate_entry(entry, data);
        if !result.is_valid() {
            let (_, message, details) = result.into_parts();
            let mut failed = ValidationResult::fail(
                message.unwrap_or_else(|| format!("Rule {index} failed")),
            )
            .with_detail("failed_rule", entry.name.as_str())
            .with_detail("rule_index", index);
            if !details.is_empty() {
                failed = failed.with_detail("rule_details", details);
            }
            return failed;
        }
    }
    ValidationResult::pass().with_detail("rules_checked", rules.len())
}

/// Valid iff at least one rule passes. An empty list is invalid.
pub fn any(evaluator: &impl RuleEvaluator, rules: &[RuleCheck], data: &Value) -> ValidationResult {
    if rules.is_empty() {
        return ValidationResult::fail("No rules given, so none can pass");
    }
    let mut errors = Vec::with_capacity(rules.len());
    for (index, entry) in rules.iter().enumerate() {
        let result = evaluator.evaluate_entry(entry, data);
        if result.is_valid() {
            return ValidationResult::pass()
                .with_detail("matched_rule", entry.name.as_str())
                .with_detail("rule_index", index);
        }
        errors.push(json!({
            "rule": entry.name.as_str(),
            "message": result.message(),
        }));
    }
    ValidationResult::fail(format!("None of the {} rules passed", rules.len()))
        .with_detail("errors", errors)
}

/// Valid iff no rule passes. An empty list is valid.
pub fn none_of(
    evaluator: &impl RuleEvaluator,
    rules: &[RuleCheck],
    data: &Value,
) -> ValidationResult {
    let violations: Vec<String> = rules
        .iter()
        .filter(|entry| evaluator.evaluate_entry(entry, data).is_valid())
        .map(|entry| entry.name.clone())
        .collect();
    if violations.is_empty() {
        return ValidationResult::pass().with_detail("rules_checked", rules.len());
    }
    ValidationResult::fail(format!(
        "Value must not satisfy: {}",
        violations.join(", ")
    ))
    .with_detail("violations", violations)
}
