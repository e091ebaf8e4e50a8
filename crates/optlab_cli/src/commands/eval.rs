//! Eval command implementation
//!
//! Evaluates a named quantity, optionally under transient overrides.

use optlab_core::types::{Overrides, ParameterSet};
use optlab_pricing::model::{Model, Quantity, Value};
use serde::Serialize;
use tracing::info;

use super::{emit, render_table, summarise};
use crate::config::OutputFormat;
use crate::Result;

/// A single evaluated quantity.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub quantity: String,
    /// Transient overrides in `name=value` form; absent for the baseline.
    pub overrides: Option<String>,
    pub value: Value,
}

/// Evaluates `quantity` on `params`, under `overrides` when non-empty.
pub fn evaluate(params: ParameterSet, quantity: Quantity, overrides: &Overrides) -> Result<EvalReport> {
    let mut model = Model::new(params)?;
    let value = if overrides.is_empty() {
        model.evaluate(quantity)?
    } else {
        model.evaluate_with(overrides, quantity)?
    };

    info!(%quantity, %overrides, "evaluated quantity");

    Ok(EvalReport {
        quantity: quantity.to_string(),
        overrides: (!overrides.is_empty()).then(|| overrides.to_string()),
        value,
    })
}

/// Run the eval command
pub fn run(
    params: ParameterSet,
    quantity: Quantity,
    overrides: &Overrides,
    format: OutputFormat,
) -> Result<()> {
    let report = evaluate(params, quantity, overrides)?;
    emit(&report, format, render)
}

fn render(report: &EvalReport) -> String {
    let mut rows = vec![
        vec!["Quantity".to_string(), report.quantity.clone()],
        vec![
            "Overrides".to_string(),
            report.overrides.clone().unwrap_or_else(|| "(none)".to_string()),
        ],
        vec!["Value".to_string(), summarise(&report.value)],
    ];
    if let Some(paths) = report.value.as_vector() {
        let min = paths.iter().copied().fold(f64::INFINITY, f64::min);
        let max = paths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        rows.push(vec!["Min".to_string(), format!("{:.4}", min)]);
        rows.push(vec!["Max".to_string(), format!("{:.4}", max)]);
    }
    render_table(&["Field", "Result"], &rows)
}
