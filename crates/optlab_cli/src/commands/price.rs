//! Price command implementation
//!
//! Prices the configured call by Monte Carlo and in closed form.

use optlab_core::types::ParameterSet;
use optlab_pricing::mc::{PayoffType, PricingResult};
use optlab_pricing::model::Model;
use serde::Serialize;
use tracing::info;

use super::{emit, render_table};
use crate::config::OutputFormat;
use crate::Result;

/// Monte Carlo and Black-Scholes prices of one call.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub params: ParameterSet,
    pub monte_carlo: PricingResult,
    pub black_scholes: f64,
    /// `|MC - BS| / BS`; absent when the closed-form price is zero.
    pub relative_error: Option<f64>,
}

/// Prices the call described by `params`.
pub fn price(params: ParameterSet) -> Result<PriceReport> {
    let mut model = Model::new(params)?;
    let monte_carlo = model.monte_carlo(PayoffType::Call)?;
    let black_scholes = model.black_scholes_call()?;

    let relative_error =
        (black_scholes > 0.0).then(|| (monte_carlo.price - black_scholes).abs() / black_scholes);

    info!(
        monte_carlo = monte_carlo.price,
        std_error = monte_carlo.std_error,
        black_scholes,
        "priced call"
    );

    Ok(PriceReport {
        params,
        monte_carlo,
        black_scholes,
        relative_error,
    })
}

/// Run the price command
pub fn run(params: ParameterSet, format: OutputFormat) -> Result<()> {
    let report = price(params)?;
    emit(&report, format, render)
}

fn render(report: &PriceReport) -> String {
    let mc = &report.monte_carlo;
    let rows = vec![
        vec!["Monte Carlo".to_string(), format!("{:.6}", mc.price)],
        vec!["  std error".to_string(), format!("{:.6}", mc.std_error)],
        vec!["  95% CI".to_string(), format!("± {:.6}", mc.confidence_95())],
        vec!["Black-Scholes".to_string(), format!("{:.6}", report.black_scholes)],
        vec![
            "Relative error".to_string(),
            report
                .relative_error
                .map_or_else(|| "n/a".to_string(), |e| format!("{:.3}%", 100.0 * e)),
        ],
    ];
    render_table(&["Call", "Price"], &rows)
}
