//! Property-based tests for assay-validator.

use assay_validator::prelude::*;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

/// Arbitrary JSON, a few levels deep.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(Value::from),
        ".{0,16}".prop_map(Value::from),
        "[a-z0-9@.:/ -]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-c]{1,2}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// One parameter set per kind, valid enough to build a check.
fn sample_params(kind: RuleKind) -> Value {
    match kind {
        RuleKind::Date | RuleKind::Time | RuleKind::Datetime => json!({}),
        RuleKind::PostalCode => json!({"country": "CA"}),
        RuleKind::MinValue => json!({"min_value": 0}),
        RuleKind::MaxValue => json!({"max_value": 100}),
        RuleKind::Range | RuleKind::Between => json!({"min_value": -5, "max_value": 5}),
        RuleKind::MinLength => json!({"min_length": 2}),
        RuleKind::MaxLength => json!({"max_length": 8}),
        RuleKind::Length => json!({"min_length": 1, "max_length": 3}),
        RuleKind::ExactLength => json!({"length": 2}),
        RuleKind::Pattern => json!({"pattern": "^[a-z]+@"}),
        RuleKind::Enum => json!({"allowed_values": [1, "a", null]}),
        RuleKind::NotIn => json!({"forbidden_values": [true, "b"]}),
        RuleKind::StartsWith => json!({"prefix": "a", "case_sensitive": false}),
        RuleKind::EndsWith => json!({"suffix": "z"}),
        RuleKind::Contains | RuleKind::NotContains => json!({"substring": "@"}),
        RuleKind::ArrayMinLength => json!({"min_items": 1}),
        RuleKind::ArrayMaxLength => json!({"max_items": 2}),
        RuleKind::ArrayLength => json!({"min_items": 1, "max_items": 3}),
        RuleKind::ArrayContains => json!({"item": 0}),
        RuleKind::ArrayItemType => json!({"item_type": "integer"}),
        RuleKind::HasProperty => json!({"property": "a"}),
        RuleKind::HasProperties => json!({"properties": ["a", "b"]}),
        RuleKind::PropertyType => json!({"property": "a", "expected_type": "string"}),
        RuleKind::PropertyValue => json!({"property": "b", "expected": 1}),
        RuleKind::Equals
        | RuleKind::NotEquals
        | RuleKind::GreaterThan
        | RuleKind::GreaterThanOrEqual
        | RuleKind::LessThan
        | RuleKind::LessThanOrEqual => json!({"compare_value": 3}),
        RuleKind::Schema => json!({"schema": {
            "required": ["a"],
            "properties": {
                "a": {"type": "string", "minLength": 1, "pattern": "^[a-z]"},
                "b": {"type": "array", "items": {"type": "integer", "minimum": 0}},
                "c": {"type": "object", "properties": {"a": {"enum": [1, 2]}}}
            }
        }}),
        RuleKind::Custom => json!({"function": "even"}),
        RuleKind::Conditional => json!({
            "condition": {"type": "contains", "value": "a"},
            "then_rules": [{"type": "min_length", "value": 2}],
            "else_rules": ["is_not_null"]
        }),
        RuleKind::Dependency => json!({"dependencies": {"a": ["b", "c"]}}),
        RuleKind::All | RuleKind::Any | RuleKind::NoneOf => {
            json!({"rules": ["is_string", {"type": "max_length", "value": 4}, "is_purple"]})
        }
        RuleKind::Completeness => json!({"required_fields": ["a", "b", "c"], "threshold": 0.5}),
        RuleKind::Consistency => json!({"consistency_rules": [
            {"fields": ["a", "b"], "relation": "less_than"},
            {"fields": ["a", "c"]}
        ]}),
        RuleKind::Uniqueness => json!({"key_field": "a"}),
        RuleKind::Accuracy => json!({"reference": 10, "tolerance": 0.5}),
        _ => json!({}),
    }
}

fn params(kind: RuleKind) -> Map<String, Value> {
    match sample_params(kind) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ============================================================================
// CATALOG: every kind builds from its sample parameters
// ============================================================================

#[test]
fn every_kind_builds() {
    for &kind in RuleKind::ALL {
        let check = Check::from_named(kind, &params(kind), &EngineConfig::default());
        assert!(check.is_ok(), "{kind}: {check:?}");
    }
}

// ============================================================================
// INVARIANTS: message is absent exactly when valid; results are repeatable
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn message_absent_iff_valid(data in json_value()) {
        let registry = ValidatorRegistry::new();
        for &kind in RuleKind::ALL {
            let result = registry.validate(kind, &params(kind), &data).unwrap();
            prop_assert_eq!(result.message().is_none(), result.is_valid(), "{} on {}", kind, data);
        }
    }

    #[test]
    fn validation_is_idempotent(data in json_value()) {
        let registry = ValidatorRegistry::new();
        for &kind in RuleKind::ALL {
            let first = registry.validate(kind, &params(kind), &data).unwrap();
            let second = registry.validate(kind, &params(kind), &data).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn batch_counts_add_up(items in prop::collection::vec(json_value(), 0..12)) {
        let report = ValidatorRegistry::new().run_batch(&Check::IsNumber, &items);
        prop_assert_eq!(report.successful() + report.failed(), report.total());
        prop_assert_eq!(report.total(), items.len());
        prop_assert!((0.0..=1.0).contains(&report.success_rate()));
        for (i, item) in report.results().iter().enumerate() {
            prop_assert_eq!(item.index, i);
            prop_assert_eq!(&item.data, &items[i]);
        }
    }
}

// ============================================================================
// COMBINATOR LAWS
// ============================================================================

proptest! {
    #[test]
    fn all_holds_iff_each_rule_holds(s in ".{0,12}") {
        let registry = ValidatorRegistry::new();
        let data = Value::from(s);
        let min = registry.evaluate(&Check::MinLength(3), &data).is_valid();
        let max = registry.evaluate(&Check::MaxLength(8), &data).is_valid();

        let rules = vec![
            RuleCheck::from_rule(&Rule::new(RuleKind::MinLength, 3), registry.config()),
            RuleCheck::from_rule(&Rule::new(RuleKind::MaxLength, 8), registry.config()),
        ];
        prop_assert_eq!(registry.evaluate(&Check::All(rules.clone()), &data).is_valid(), min && max);
        prop_assert_eq!(registry.evaluate(&Check::Any(rules.clone()), &data).is_valid(), min || max);
        prop_assert_eq!(registry.evaluate(&Check::NoneOf(rules), &data).is_valid(), !min && !max);
    }

    #[test]
    fn luhn_digit_changes_are_caught(
        digits in prop::collection::vec(0u32..10, 15),
        position in 0usize..15,
        delta in 1u32..10,
    ) {
        // Complete the 15 digits with the Luhn check digit.
        let body: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect();
        let check_digit = (0..10)
            .find(|c| assay_validator::validators::format::luhn(&format!("{body}{c}")))
            .unwrap();
        let number = format!("{body}{check_digit}");
        prop_assert!(assay_validator::validators::format::luhn(&number));

        let mut altered: Vec<char> = number.chars().collect();
        let old = altered[position].to_digit(10).unwrap();
        altered[position] = char::from_digit((old + delta) % 10, 10).unwrap();
        let altered: String = altered.into_iter().collect();
        prop_assert!(!assay_validator::validators::format::luhn(&altered));
    }
}
