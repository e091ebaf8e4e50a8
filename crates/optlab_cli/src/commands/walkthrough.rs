//! Walkthrough command implementation
//!
//! Replays the reference pricing session on one model: the baseline, two
//! what-if questions on (r, sigma), the baseline again, then persistent
//! changes to the strike and the step count.

use optlab_core::types::{Overrides, Parameter, ParameterSet};
use optlab_pricing::model::Model;
use serde::Serialize;
use tracing::info;

use super::{emit, render_table};
use crate::config::OutputFormat;
use crate::Result;

/// Strike after the persistent strike change.
const WALKTHROUGH_STRIKE: f64 = 100.0;

/// Step count after the persistent step change.
const WALKTHROUGH_STEPS: usize = 100;

/// One row of the walkthrough.
#[derive(Debug, Clone, Serialize)]
pub struct WalkthroughStep {
    pub label: String,
    /// Parameters in effect, as `name=value` changes from the start.
    pub changes: String,
    pub call_option: f64,
    pub black_scholes: f64,
}

/// Runs the walkthrough from `params`.
pub fn walkthrough(params: ParameterSet) -> Result<Vec<WalkthroughStep>> {
    let mut model = Model::new(params)?;
    let mut steps = Vec::with_capacity(6);

    steps.push(baseline_step("baseline", &mut model, &params)?);

    for overrides in [
        Overrides::new()
            .with(Parameter::Rate, 0.03)
            .with(Parameter::Volatility, 0.15),
        Overrides::new()
            .with(Parameter::Rate, 0.06)
            .with(Parameter::Volatility, 0.4),
    ] {
        let scenario = model.scenario(&overrides)?;
        steps.push(WalkthroughStep {
            label: "what-if".to_string(),
            changes: overrides.to_string(),
            call_option: scenario.call_option()?,
            black_scholes: scenario.black_scholes_call()?,
        });
    }

    steps.push(baseline_step("baseline again", &mut model, &params)?);

    model.set_strike(WALKTHROUGH_STRIKE)?;
    steps.push(baseline_step("set strike", &mut model, &params)?);

    model.set_steps(WALKTHROUGH_STEPS)?;
    steps.push(baseline_step("set steps", &mut model, &params)?);

    for step in &steps {
        info!(
            label = %step.label,
            changes = %step.changes,
            call_option = step.call_option,
            black_scholes = step.black_scholes,
            "walkthrough step"
        );
    }

    Ok(steps)
}

fn baseline_step(label: &str, model: &mut Model, start: &ParameterSet) -> Result<WalkthroughStep> {
    let current = *model.params();
    let changes: Vec<String> = start
        .changed(&current)
        .into_iter()
        .map(|p| format!("{}={}", p, current.get(p)))
        .collect();

    Ok(WalkthroughStep {
        label: label.to_string(),
        changes: if changes.is_empty() {
            "(none)".to_string()
        } else {
            changes.join(",")
        },
        call_option: model.call_option()?,
        black_scholes: model.black_scholes_call()?,
    })
}

/// Run the walkthrough command
pub fn run(params: ParameterSet, format: OutputFormat) -> Result<()> {
    let steps = walkthrough(params)?;
    emit(&steps, format, |steps| render(steps))
}

fn render(steps: &[WalkthroughStep]) -> String {
    let rows: Vec<Vec<String>> = steps
        .iter()
        .map(|s| {
            vec![
                s.label.clone(),
                s.changes.clone(),
                format!("{:.6}", s.call_option),
                format!("{:.6}", s.black_scholes),
            ]
        })
        .collect();
    render_table(&["Step", "Changes", "CallOption", "BlackScholesCall"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_walkthrough_sequence() {
        let params = ParameterSet {
            n_paths: 2_000,
            ..ParameterSet::default()
        };
        let steps = walkthrough(params).unwrap();
        assert_eq!(steps.len(), 6);

        assert_relative_eq!(steps[0].black_scholes, 16.210871364283975, epsilon = 1e-10);
        assert_relative_eq!(steps[1].black_scholes, 10.099199582381928, epsilon = 1e-9);
        assert_relative_eq!(steps[2].black_scholes, 30.24274009595205, epsilon = 1e-9);

        // What-if questions leave the baseline untouched
        assert_eq!(steps[3].call_option, steps[0].call_option);
        assert_eq!(steps[3].changes, "(none)");

        assert_eq!(steps[4].changes, "K=100");
        assert_relative_eq!(steps[4].black_scholes, 20.924360952895213, epsilon = 1e-9);
        assert!(steps[4].call_option > steps[0].call_option);

        assert_eq!(steps[5].changes, "N=100,K=100");
        assert_eq!(steps[5].black_scholes, steps[4].black_scholes);
    }

    #[test]
    fn test_render_has_a_row_per_step() {
        let params = ParameterSet {
            n_paths: 200,
            ..ParameterSet::default()
        };
        let table = render(&walkthrough(params).unwrap());
        assert_eq!(table.lines().count(), 4 + 6);
        assert!(table.contains("r=0.03,sigma=0.15"));
    }
}
