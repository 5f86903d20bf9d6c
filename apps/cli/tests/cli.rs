//! End-to-end tests for the `assay` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

fn assay() -> Command {
    let mut cmd = Command::cargo_bin("assay").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

// ============================================================================
// VALIDATE
// ============================================================================

#[test]
fn valid_request_exits_zero() {
    let output = assay()
        .arg("validate")
        .write_stdin(r#"{"validation_type": "email", "data": "user@example.com"}"#)
        .assert()
        .code(0)
        .get_output()
        .stdout
        .clone();
    let response = stdout_json(&output);
    assert_eq!(response["status"], json!("success"));
    assert_eq!(response["result"]["valid"], json!(true));
}

#[test]
fn invalid_value_exits_one() {
    assay()
        .args(["validate", "--request", "-"])
        .write_stdin(r#"{"validation_type": "range", "data": 15, "min_value": 1, "max_value": 10}"#)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("must be between 1 and 10"));
}

#[test]
fn rejected_request_exits_two() {
    assay()
        .arg("validate")
        .write_stdin(r#"{"validation_type": "telepathy", "data": 1}"#)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("unknown validation type: telepathy"));

    assay()
        .arg("validate")
        .write_stdin("{not json")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"status\":\"error\""));
}

#[test]
fn batch_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        json!({"validation_type": "is_number", "data_list": [1, "x", 3]})
    )
    .unwrap();

    let output = assay()
        .args(["validate", "--pretty", "--request"])
        .arg(file.path())
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let response = stdout_json(&output);
    assert_eq!(response["result"]["successful"], json!(2));
    assert_eq!(response["result"]["failed"], json!(1));
}

#[test]
fn missing_request_file_is_an_error() {
    assay()
        .args(["validate", "--request", "/definitely/not/here.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read request file"));
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn config_file_sets_engine_limits() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("limits.toml");
    std::fs::write(&config, "[engine]\nmax_pattern_length = 3\n").unwrap();

    assay()
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .write_stdin(r#"{"validation_type": "pattern", "data": "aaaa", "pattern": "^a+$"}"#)
        .assert()
        .code(1);

    assay()
        .arg("validate")
        .current_dir(dir.path())
        .write_stdin(r#"{"validation_type": "pattern", "data": "aaaa", "pattern": "^a+$"}"#)
        .assert()
        .code(0);
}

#[test]
fn missing_config_file_is_an_error() {
    assay()
        .args(["--config", "/definitely/not/assay.toml", "kinds"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

// ============================================================================
// KINDS
// ============================================================================

#[test]
fn kinds_lists_catalog() {
    assay()
        .arg("kinds")
        .assert()
        .success()
        .stdout(predicate::str::contains("credit_card"))
        .stdout(predicate::str::contains("completeness"));
}

#[test]
fn kinds_filters_by_category() {
    let output = assay()
        .args(["kinds", "--category", "quality", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let kinds: Vec<String> = stdout_json(&output)
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["completeness", "consistency", "uniqueness", "accuracy"]);
}

#[test]
fn unknown_category_is_rejected() {
    assay().args(["kinds", "--category", "astrology"]).assert().failure();
}
