//! CLI configuration management
//!
//! Builds the effective configuration from, in increasing priority:
//! 1. `Default` values
//! 2. A TOML file (`--config`, or `optlab.toml` if present)
//! 3. `OPTLAB__*` environment variables, e.g. `OPTLAB__PARAMS__RATE=0.03`
//! 4. Command-line `--set NAME=VALUE` assignments and `--verbose`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ::config::{Config, Environment, File, FileFormat, Map};
use clap::ValueEnum;
use optlab_core::types::{Parameter, ParameterSet};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "optlab.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "OPTLAB";

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Effective CLI configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Default output format
    pub output: OutputFormat,
    /// Baseline pricing parameters
    pub params: ParameterSet,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> std::result::Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Command-line inputs to configuration building
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Explicit config file path; must exist when given
    pub config_file: Option<PathBuf>,
    /// `--set` assignments, applied in order
    pub assignments: Vec<(Parameter, f64)>,
    /// Raise the log level to at least `debug`
    pub verbose: bool,
}

/// Build configuration from all sources
///
/// # Errors
///
/// Returns `CliError::Config` if a source cannot be read or deserialised and
/// `CliError::Pricing` if the resulting parameters are invalid.
pub fn build_config(args: &ConfigArgs) -> Result<CliConfig> {
    build_config_from(args, None)
}

/// Same as [`build_config`], reading environment variables from `env`
/// instead of the process environment when given.
fn build_config_from(args: &ConfigArgs, env: Option<Map<String, String>>) -> Result<CliConfig> {
    let file = match &args.config_file {
        Some(path) => File::from(path.as_path())
            .format(FileFormat::Toml)
            .required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_FILE))
            .format(FileFormat::Toml)
            .required(false),
    };

    let environment = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .source(env);

    let mut config: CliConfig = Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    for &(parameter, value) in &args.assignments {
        config.params.assign(parameter, value)?;
    }
    if args.verbose && config.log_level != LogLevel::Trace {
        config.log_level = LogLevel::Debug;
    }

    config.params.validate()?;
    Ok(config)
}
