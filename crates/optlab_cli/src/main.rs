//! optlab CLI - Monte Carlo vs Black-Scholes option pricing
//!
//! # Commands
//!
//! - `optlab price` - Price the configured call by Monte Carlo and in closed form
//! - `optlab eval <QUANTITY> [--with NAME=VALUE]...` - Evaluate a named quantity
//! - `optlab what-if --scenario "r=0.03,sigma=0.15"...` - Parallel what-if table
//! - `optlab walkthrough` - Replay the reference pricing session
//! - `optlab config` - Print the effective configuration
//!
//! Global `--set NAME=VALUE` assignments change the baseline for every
//! command; `--with` and `--scenario` overrides apply to one evaluation only.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use optlab_core::types::{parse_assignment, Overrides, Parameter};
use optlab_pricing::model::Quantity;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use crate::config::{build_config, ConfigArgs, OutputFormat};

/// optlab option pricing CLI
#[derive(Parser)]
#[command(name = "optlab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Persistently set a parameter, e.g. `--set K=100`
    #[arg(long = "set", global = true, value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set: Vec<(Parameter, f64)>,

    /// Output format (overrides the configured one)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the call by Monte Carlo and Black-Scholes
    Price,

    /// Evaluate a quantity: S(i), CallOption, PutOption, BlackScholesCall, BlackScholesPut
    Eval {
        /// Quantity to evaluate
        quantity: Quantity,

        /// Transient override, e.g. `--with sigma=0.3`
        #[arg(long = "with", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        with: Vec<(Parameter, f64)>,
    },

    /// Evaluate a quantity under several override sets in parallel
    WhatIf {
        /// Override set, e.g. `--scenario "r=0.03,sigma=0.15"`
        #[arg(short, long = "scenario", required = true)]
        scenarios: Vec<Overrides>,

        /// Quantity to evaluate
        #[arg(short, long, default_value = "CallOption")]
        quantity: Quantity,
    },

    /// Replay the reference pricing session
    Walkthrough,

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let args = ConfigArgs {
        config_file: cli.config.clone(),
        assignments: cli.set.clone(),
        verbose: cli.verbose,
    };
    let config = build_config(&args).context("failed to load configuration")?;

    init_tracing(config.log_level.as_filter_str());
    debug!(params = ?config.params, log_level = %config.log_level, "configuration loaded");

    let params = config.params;
    let format = cli.format.unwrap_or(config.output);

    match cli.command {
        Commands::Price => commands::price::run(params, format)?,
        Commands::Eval { quantity, with } => {
            let mut overrides = Overrides::new();
            for (parameter, value) in with {
                overrides.set(parameter, value);
            }
            commands::eval::run(params, quantity, &overrides, format)?
        }
        Commands::WhatIf {
            scenarios,
            quantity,
        } => commands::what_if::run(params, &scenarios, quantity, format)?,
        Commands::Walkthrough => commands::walkthrough::run(params, format)?,
        Commands::Config => commands::config::run(&config)?,
    }

    info!("done");
    Ok(())
}
