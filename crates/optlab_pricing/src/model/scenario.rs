//! Scenario spaces and parallel what-if evaluation.
//!
//! A scenario is a context derived from the baseline by an [`Overrides`]
//! set. [`Model::scenario`] memoises one context per distinct override set,
//! so repeating a what-if query reuses that scenario's caches. The table is
//! dropped whenever a baseline parameter changes.
//!
//! [`Model::evaluate_scenarios`] evaluates many override sets at once on the
//! rayon pool. Each one gets its own context; the only state they share is
//! the immutable draw matrix.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use optlab_core::types::{Overrides, PricingError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::{derive_context, Model, Quantity, Value};
use crate::mc::DrawMatrix;

/// Outcome of one what-if evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioResult {
    /// Overrides in `name=value` form.
    pub overrides: String,
    /// Evaluated quantity.
    pub quantity: String,
    /// Value, or the error message if evaluation failed.
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
}

/// Value or error of a what-if evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioOutcome {
    /// Successful evaluation.
    Value(Value),
    /// Failed evaluation.
    Error(String),
}

impl ScenarioResult {
    fn new(overrides: &Overrides, quantity: Quantity, result: Result<Value, PricingError>) -> Self {
        Self {
            overrides: overrides.to_string(),
            quantity: quantity.to_string(),
            outcome: match result {
                Ok(value) => ScenarioOutcome::Value(value),
                Err(err) => ScenarioOutcome::Error(err.to_string()),
            },
        }
    }

    /// The scalar value, if evaluation succeeded with one.
    pub fn scalar(&self) -> Option<f64> {
        match &self.outcome {
            ScenarioOutcome::Value(value) => value.as_scalar(),
            ScenarioOutcome::Error(_) => None,
        }
    }
}

impl Model {
    /// Returns the memoised scenario context for `overrides`, deriving it
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if the overridden parameter
    /// set is invalid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optlab_core::types::{Overrides, ParameterSet};
    /// use optlab_pricing::model::Model;
    ///
    /// let mut model = Model::new(ParameterSet { n_paths: 1_000, ..ParameterSet::default() }).unwrap();
    /// let overrides: Overrides = "r=0.03,sigma=0.15".parse().unwrap();
    ///
    /// let first = model.scenario(&overrides).unwrap().call_option().unwrap();
    /// assert_eq!(model.scenario(&overrides).unwrap().cached_steps(), 37);
    /// assert_eq!(model.scenario(&overrides).unwrap().call_option().unwrap(), first);
    /// assert_eq!(model.scenario_count(), 1);
    /// ```
    pub fn scenario(&mut self, overrides: &Overrides) -> Result<&mut Model, PricingError> {
        match self.scenarios.entry(overrides.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let derived = derive_context(&self.params, self.draws.as_ref(), overrides)?;
                Ok(entry.insert(derived))
            }
        }
    }

    /// Number of memoised scenario contexts.
    #[inline]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    /// Drops every memoised scenario context.
    pub fn clear_scenarios(&mut self) {
        self.scenarios.clear();
    }

    /// Evaluates `quantity` under each override set in parallel.
    ///
    /// Results are returned in input order. A failing scenario reports its
    /// error without affecting the others. When the baseline has no draw
    /// matrix yet, one is generated for the duration of the call and shared
    /// by every scenario that keeps N, M and the seed; the baseline itself is
    /// not modified.
    pub fn evaluate_scenarios(
        &self,
        scenarios: &[Overrides],
        quantity: Quantity,
    ) -> Vec<ScenarioResult> {
        let shared = self.shared_draws(scenarios);

        debug!(
            count = scenarios.len(),
            %quantity,
            shares_draws = shared.is_some(),
            "evaluating scenarios"
        );

        scenarios
            .par_iter()
            .map(|overrides| {
                let result = derive_context(&self.params, shared.as_ref(), overrides)
                    .and_then(|mut model| model.evaluate(quantity));
                ScenarioResult::new(overrides, quantity, result)
            })
            .collect()
    }

    fn shared_draws(&self, scenarios: &[Overrides]) -> Option<Arc<DrawMatrix>> {
        if let Some(draws) = &self.draws {
            return Some(Arc::clone(draws));
        }
        if scenarios.iter().all(Overrides::affects_draws) {
            return None;
        }
        DrawMatrix::generate(self.params.n_steps, self.params.n_paths, self.params.seed)
            .ok()
            .map(Arc::new)
    }
}
