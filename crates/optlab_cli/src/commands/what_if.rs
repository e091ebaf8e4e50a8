//! What-if command implementation
//!
//! Evaluates one quantity under several override sets in parallel and
//! shows them next to the unchanged baseline.

use optlab_core::types::{Overrides, ParameterSet};
use optlab_pricing::model::{Model, Quantity, ScenarioOutcome, ScenarioResult, Value};
use serde::Serialize;
use tracing::info;

use super::{emit, render_table, summarise};
use crate::config::OutputFormat;
use crate::Result;

/// Baseline value and one result per scenario.
#[derive(Debug, Clone, Serialize)]
pub struct WhatIfReport {
    pub quantity: String,
    pub baseline: Value,
    pub scenarios: Vec<ScenarioResult>,
}

/// Evaluates `quantity` on the baseline and under each override set.
///
/// The baseline is evaluated first so that scenarios keeping N, M and the
/// seed reuse its draw matrix.
pub fn what_if(
    params: ParameterSet,
    scenarios: &[Overrides],
    quantity: Quantity,
) -> Result<WhatIfReport> {
    let mut model = Model::new(params)?;
    let baseline = model.evaluate(quantity)?;
    let results = model.evaluate_scenarios(scenarios, quantity);

    let failed = results
        .iter()
        .filter(|r| matches!(r.outcome, ScenarioOutcome::Error(_)))
        .count();
    info!(%quantity, scenarios = results.len(), failed, "what-if complete");

    Ok(WhatIfReport {
        quantity: quantity.to_string(),
        baseline,
        scenarios: results,
    })
}

/// Run the what-if command
pub fn run(
    params: ParameterSet,
    scenarios: &[Overrides],
    quantity: Quantity,
    format: OutputFormat,
) -> Result<()> {
    let report = what_if(params, scenarios, quantity)?;
    emit(&report, format, render)
}

fn render(report: &WhatIfReport) -> String {
    let mut rows = vec![vec!["(baseline)".to_string(), summarise(&report.baseline)]];
    rows.extend(report.scenarios.iter().map(|result| {
        let cell = match &result.outcome {
            ScenarioOutcome::Value(value) => summarise(value),
            ScenarioOutcome::Error(message) => format!("error: {}", message),
        };
        vec![result.overrides.clone(), cell]
    }));
    render_table(&["Overrides", report.quantity.as_str()], &rows)
}
