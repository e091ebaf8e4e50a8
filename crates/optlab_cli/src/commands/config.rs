//! Config command implementation
//!
//! Prints the effective configuration as TOML.

use crate::config::CliConfig;
use crate::Result;

/// Renders `config` as TOML.
pub fn render(config: &CliConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Run the config command
pub fn run(config: &CliConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}
