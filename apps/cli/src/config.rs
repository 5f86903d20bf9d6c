//! CLI configuration.
//!
//! Layers, lowest precedence first: built-in defaults, the configuration
//! file, `ASSAY_*` environment variables (`__` separates nested keys, as in
//! `ASSAY_ENGINE__MAX_SCHEMA_DEPTH`), then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use assay_validator::config::EngineConfig;
use clap::ValueEnum;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "assay.toml";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per line.
    Json,
}

/// Settings for one CLI run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log line format.
    pub log_format: LogFormat,
    /// Engine limits.
    pub engine: EngineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::default(),
            engine: EngineConfig::default(),
        }
    }
}

/// Flag values that override every other layer.
#[derive(Debug, Default, Serialize)]
struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_format: Option<LogFormat>,
}

impl CliConfig {
    /// Loads the layered configuration for `cli`.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("configuration file {} does not exist", path.display());
                }
                path.clone()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        Self::figment(&file)
            .merge(Serialized::defaults(FlagOverrides {
                log_level: cli.log_level.clone(),
                log_format: cli.log_format,
            }))
            .extract()
            .with_context(|| format!("invalid configuration (file {})", file.display()))
    }

    /// Defaults, then `file` (skipped when missing), then the environment.
    fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("ASSAY_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn layers_in_order() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "assay.toml",
                r#"
                    log_level = "info"

                    [engine]
                    max_schema_depth = 4
                "#,
            )?;
            jail.set_env("ASSAY_ENGINE__PARALLEL_THRESHOLD", "8");

            let config: CliConfig = CliConfig::figment(Path::new("assay.toml")).extract()?;
            assert_eq!(config.log_level, "info");
            assert_eq!(config.log_format, LogFormat::Plain);
            assert_eq!(config.engine.max_schema_depth, 4);
            assert_eq!(config.engine.parallel_threshold, 8);
            Ok(())
        });
    }

    #[test]
    fn missing_file_means_defaults() {
        Jail::expect_with(|_| {
            let config: CliConfig = CliConfig::figment(Path::new("absent.toml")).extract()?;
            assert_eq!(config, CliConfig::default());
            Ok(())
        });
    }
}
