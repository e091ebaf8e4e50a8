//! CLI error types.

use optlab_core::types::PricingError;
use thiserror::Error;

/// Errors raised by the `optlab` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Layered configuration could not be read or deserialised.
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Pricing failed or a parameter was rejected.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Log level name not recognised.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// JSON or TOML output could not be produced.
    #[error("Serialisation error: {0}")]
    Serialisation(String),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialisation(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::Serialisation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_is_transparent() {
        let err: CliError = PricingError::EmptyPathSet.into();
        assert_eq!(err.to_string(), PricingError::EmptyPathSet.to_string());
    }

    #[test]
    fn test_log_level_message() {
        let err = CliError::InvalidLogLevel("loud".to_string());
        assert!(err.to_string().starts_with("Invalid log level: loud"));
    }
}
