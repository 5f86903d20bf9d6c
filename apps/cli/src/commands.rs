//! Subcommand implementations.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use assay_validator::prelude::*;
use serde_json::Value;

/// Exit code for a valid value.
pub const EXIT_VALID: u8 = 0;
/// Exit code for a value that failed validation.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for a rejected request or a failed run.
pub const EXIT_ERROR: u8 = 2;

/// Reads a request, evaluates it and prints the response.
pub fn validate(
    registry: &ValidatorRegistry,
    request: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<ExitCode> {
    let text = read_request(request)?;
    let response = match serde_json::from_str::<Value>(&text) {
        Ok(raw) => handle_json(registry, raw),
        Err(e) => ValidationResponse::error(&EngineError::InvalidRequest(format!(
            "request is not valid JSON: {e}"
        ))),
    };

    let wire = response.to_json_value();
    let rendered = if pretty {
        serde_json::to_string_pretty(&wire)?
    } else {
        serde_json::to_string(&wire)?
    };
    writeln!(io::stdout().lock(), "{rendered}")?;

    let code = match response.result() {
        Some(result) if result.is_valid() => EXIT_VALID,
        Some(_) => EXIT_INVALID,
        None => EXIT_ERROR,
    };
    Ok(ExitCode::from(code))
}

/// Prints the kind catalog.
pub fn kinds(category: Option<Category>, json: bool) -> anyhow::Result<ExitCode> {
    let descriptors: Vec<KindDescriptor> = catalog()
        .into_iter()
        .filter(|d| category.is_none_or(|c| d.category == c))
        .collect();

    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&descriptors)?)?;
    } else {
        for descriptor in &descriptors {
            let params: Vec<String> = descriptor
                .params
                .iter()
                .map(|p| {
                    if p.required {
                        p.name.to_string()
                    } else {
                        format!("[{}]", p.name)
                    }
                })
                .collect();
            writeln!(
                out,
                "{:<24} {:<11} {:<40} {}",
                descriptor.kind.as_str(),
                descriptor.category.as_str(),
                params.join(" "),
                descriptor.summary
            )?;
        }
    }
    Ok(ExitCode::from(EXIT_VALID))
}

fn read_request(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read request from stdin")?;
            Ok(text)
        }
    }
}
