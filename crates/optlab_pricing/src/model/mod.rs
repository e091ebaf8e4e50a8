//! Pricing context with lazy, memoised evaluation.
//!
//! A [`Model`] owns a validated [`ParameterSet`] together with the caches
//! derived from it:
//!
//! | Cache | Depends on | Discarded when |
//! |-------|------------|----------------|
//! | draw matrix | N, M, seed | any of N, M, seed changes |
//! | price steps `S(0)..=S(k)` | T, N, S0, r, sigma, M, seed | anything but K changes |
//!
//! Option prices are not cached: they are re-aggregated from the cached
//! terminal step on every request, so they always reflect the current
//! strike.
//!
//! # Persistent changes and what-if queries
//!
//! [`Model::set`] reassigns a baseline parameter and applies the
//! invalidation rules above. What-if queries never touch the baseline:
//! [`Model::derive`] returns a new context with the overrides applied
//! (copy-on-override). The derived context starts with an empty path cache
//! and shares the baseline's draw matrix only when the overrides leave N, M
//! and the seed alone.
//!
//! ```rust
//! use optlab_core::types::{Overrides, Parameter, ParameterSet};
//! use optlab_pricing::model::Model;
//!
//! let mut model = Model::new(ParameterSet { n_paths: 2_000, ..ParameterSet::default() }).unwrap();
//! let baseline = model.call_option().unwrap();
//!
//! let stressed = Overrides::new()
//!     .with(Parameter::Rate, 0.06)
//!     .with(Parameter::Volatility, 0.4);
//! let mut scenario = model.derive(&stressed).unwrap();
//! assert!(scenario.call_option().unwrap() > baseline);
//!
//! // The baseline is unchanged
//! assert_eq!(model.call_option().unwrap(), baseline);
//! assert_eq!(model.params().rate, 0.05);
//! ```

mod quantity;
mod scenario;

use std::collections::HashMap;
use std::sync::Arc;

use optlab_core::types::{Overrides, Parameter, ParameterSet, PricingError};
use tracing::debug;

use crate::analytical::{black_scholes_call, black_scholes_put};
use crate::mc::{discounted_payoff, DrawMatrix, PathCache, PayoffType, PricingResult};

pub use quantity::{Quantity, Value};
pub use scenario::{ScenarioOutcome, ScenarioResult};

/// Parameter context plus the caches computed from it.
#[derive(Clone, Debug)]
pub struct Model {
    params: ParameterSet,
    draws: Option<Arc<DrawMatrix>>,
    paths: PathCache,
    scenarios: HashMap<Overrides, Model>,
}

impl Model {
    /// Creates a context for a parameter set. Nothing is computed yet.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if the parameters are invalid.
    pub fn new(params: ParameterSet) -> Result<Self, PricingError> {
        params.validate()?;
        Ok(Self {
            params,
            draws: None,
            paths: PathCache::new(),
            scenarios: HashMap::new(),
        })
    }

    /// Current baseline parameters.
    #[inline]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Persistently reassigns one parameter.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if the new value is invalid;
    /// the model is left unchanged in that case.
    pub fn set(&mut self, parameter: Parameter, value: f64) -> Result<(), PricingError> {
        let mut next = self.params;
        next.assign(parameter, value)?;
        self.replace_params(next)
    }

    /// Persistently replaces the whole parameter set.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if `params` is invalid; the
    /// model is left unchanged in that case.
    pub fn replace_params(&mut self, params: ParameterSet) -> Result<(), PricingError> {
        params.validate()?;
        let changed = self.params.changed(&params);
        if changed.is_empty() {
            return Ok(());
        }

        debug!(changed = ?changed, "baseline parameters changed");

        if changed.iter().any(Parameter::affects_draws) && self.draws.take().is_some() {
            debug!("draw matrix invalidated");
        }
        if changed.iter().any(Parameter::affects_paths) {
            self.paths.clear();
        }
        self.scenarios.clear();
        self.params = params;
        Ok(())
    }

    /// Sets the strike (K). Cached paths stay valid.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for a non-positive strike.
    pub fn set_strike(&mut self, strike: f64) -> Result<(), PricingError> {
        self.set(Parameter::Strike, strike)
    }

    /// Sets the step count (N). Discards draws and paths.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for zero steps.
    pub fn set_steps(&mut self, n_steps: usize) -> Result<(), PricingError> {
        self.replace_params(ParameterSet {
            n_steps,
            ..self.params
        })
    }

    /// Sets the path count (M). Discards draws and paths.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for zero paths.
    pub fn set_paths(&mut self, n_paths: usize) -> Result<(), PricingError> {
        self.replace_params(ParameterSet {
            n_paths,
            ..self.params
        })
    }

    /// Sets the seed. Discards draws and paths.
    pub fn set_seed(&mut self, seed: u64) -> Result<(), PricingError> {
        self.replace_params(ParameterSet { seed, ..self.params })
    }

    /// Sets the risk-free rate (r). Keeps the draws, discards paths.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for a non-finite rate.
    pub fn set_rate(&mut self, rate: f64) -> Result<(), PricingError> {
        self.set(Parameter::Rate, rate)
    }

    /// Sets the volatility (sigma). Keeps the draws, discards paths.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` for a negative volatility.
    pub fn set_volatility(&mut self, volatility: f64) -> Result<(), PricingError> {
        self.set(Parameter::Volatility, volatility)
    }

    /// Returns the draw matrix, generating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if the matrix cannot be sized.
    pub fn draw_matrix(&mut self) -> Result<Arc<DrawMatrix>, PricingError> {
        if let Some(draws) = &self.draws {
            return Ok(Arc::clone(draws));
        }
        let draws = Arc::new(DrawMatrix::generate(
            self.params.n_steps,
            self.params.n_paths,
            self.params.seed,
        )?);
        self.draws = Some(Arc::clone(&draws));
        Ok(draws)
    }

    /// The cached draw matrix, if it has been generated.
    #[inline]
    pub fn cached_draws(&self) -> Option<&Arc<DrawMatrix>> {
        self.draws.as_ref()
    }

    /// Number of price steps currently cached.
    #[inline]
    pub fn cached_steps(&self) -> usize {
        self.paths.cached_steps()
    }

    /// Simulated price vector `S(step)`, one entry per path.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::StepOutOfRange` if `step > N`.
    pub fn price_at_step(&mut self, step: usize) -> Result<&[f64], PricingError> {
        if step > self.params.n_steps {
            return Err(PricingError::StepOutOfRange {
                step,
                n_steps: self.params.n_steps,
            });
        }
        let draws = self.draw_matrix()?;
        self.paths.price_at_step(step, &self.params, &draws)
    }

    /// Terminal price vector `S(N)`.
    ///
    /// # Errors
    ///
    /// Propagates draw generation failures.
    pub fn terminal_prices(&mut self) -> Result<&[f64], PricingError> {
        self.price_at_step(self.params.n_steps)
    }

    /// Monte Carlo estimate of a vanilla option with standard error.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::EmptyPathSet` if there are no paths.
    pub fn monte_carlo(&mut self, payoff: PayoffType) -> Result<PricingResult, PricingError> {
        let ParameterSet {
            strike,
            rate,
            maturity,
            ..
        } = self.params;
        let terminal = self.terminal_prices()?;
        discounted_payoff(terminal, payoff, strike, rate, maturity)
    }

    /// Monte Carlo European call price, `exp(-rT) × mean(max(S(N) - K, 0))`.
    ///
    /// # Errors
    ///
    /// Same as [`monte_carlo`](Self::monte_carlo).
    pub fn call_option(&mut self) -> Result<f64, PricingError> {
        Ok(self.monte_carlo(PayoffType::Call)?.price)
    }

    /// Monte Carlo European put price.
    ///
    /// # Errors
    ///
    /// Same as [`monte_carlo`](Self::monte_carlo).
    pub fn put_option(&mut self) -> Result<f64, PricingError> {
        Ok(self.monte_carlo(PayoffType::Put)?.price)
    }

    /// Closed-form Black-Scholes call price for the current parameters.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::DivisionByZero` if sigma is zero.
    pub fn black_scholes_call(&self) -> Result<f64, PricingError> {
        black_scholes_call(&self.params)
    }

    /// Closed-form Black-Scholes put price for the current parameters.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::DivisionByZero` if sigma is zero.
    pub fn black_scholes_put(&self) -> Result<f64, PricingError> {
        black_scholes_put(&self.params)
    }

    /// Evaluates a named quantity.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying computation.
    pub fn evaluate(&mut self, quantity: Quantity) -> Result<Value, PricingError> {
        match quantity {
            Quantity::Step(step) => Ok(Value::Vector(self.price_at_step(step)?.to_vec())),
            Quantity::CallOption => self.call_option().map(Value::Scalar),
            Quantity::PutOption => self.put_option().map(Value::Scalar),
            Quantity::BlackScholesCall => self.black_scholes_call().map(Value::Scalar),
            Quantity::BlackScholesPut => self.black_scholes_put().map(Value::Scalar),
        }
    }

    /// Derives an independent context with the overrides applied.
    ///
    /// The baseline is borrowed immutably and cannot change. The derived
    /// context has its own path cache; it reuses the baseline draw matrix
    /// when one is cached and the overrides leave N, M and the seed alone.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if the overridden parameter
    /// set is invalid.
    pub fn derive(&self, overrides: &Overrides) -> Result<Model, PricingError> {
        derive_context(&self.params, self.draws.as_ref(), overrides)
    }

    /// Evaluates a quantity under transient overrides.
    ///
    /// # Errors
    ///
    /// Same as [`derive`](Self::derive) and [`evaluate`](Self::evaluate).
    pub fn evaluate_with(
        &self,
        overrides: &Overrides,
        quantity: Quantity,
    ) -> Result<Value, PricingError> {
        self.derive(overrides)?.evaluate(quantity)
    }
}

/// Builds a derived context from baseline parameters and (optionally) the
/// baseline draw matrix.
fn derive_context(
    params: &ParameterSet,
    draws: Option<&Arc<DrawMatrix>>,
    overrides: &Overrides,
) -> Result<Model, PricingError> {
    let derived = params.with_overrides(overrides)?;
    let shared = draws
        .filter(|d| d.matches(derived.n_steps, derived.n_paths, derived.seed))
        .map(Arc::clone);

    debug!(%overrides, shares_draws = shared.is_some(), "derived context");

    Ok(Model {
        params: derived,
        draws: shared,
        paths: PathCache::new(),
        scenarios: HashMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_model() -> Model {
        Model::new(ParameterSet {
            n_paths: 500,
            ..ParameterSet::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let params = ParameterSet {
            n_steps: 0,
            ..ParameterSet::default()
        };
        assert!(Model::new(params).is_err());
    }

    #[test]
    fn test_lazy_generation() {
        let mut model = small_model();
        assert!(model.cached_draws().is_none());
        assert_eq!(model.cached_steps(), 0);

        model.price_at_step(3).unwrap();
        assert!(model.cached_draws().is_some());
        assert_eq!(model.cached_steps(), 4);
    }

    #[test]
    fn test_step_zero_is_spot() {
        let mut model = small_model();
        let s0 = model.price_at_step(0).unwrap();
        assert_eq!(s0.len(), 500);
        assert!(s0.iter().all(|&s| s == 100.0));
    }

    #[test]
    fn test_step_out_of_range() {
        let mut model = small_model();
        assert_eq!(
            model.price_at_step(37),
            Err(PricingError::StepOutOfRange {
                step: 37,
                n_steps: 36
            })
        );
        // Rejected before anything is generated
        assert!(model.cached_draws().is_none());
    }

    #[test]
    fn test_rate_change_keeps_draws_drops_paths() {
        let mut model = small_model();
        model.call_option().unwrap();
        let draws = Arc::clone(model.cached_draws().unwrap());

        model.set_rate(0.03).unwrap();

        assert!(Arc::ptr_eq(model.cached_draws().unwrap(), &draws));
        assert_eq!(model.cached_steps(), 0);
    }

    #[test]
    fn test_step_change_regenerates_draws() {
        let mut model = small_model();
        model.call_option().unwrap();

        model.set_steps(48).unwrap();
        assert!(model.cached_draws().is_none());

        let draws = model.draw_matrix().unwrap();
        assert_eq!(draws.n_steps(), 48);
        assert_eq!(draws.n_paths(), 500);
    }

    #[test]
    fn test_seed_change_regenerates_draws() {
        let mut model = small_model();
        let before = model.call_option().unwrap();
        model.set_seed(99).unwrap();
        assert!(model.cached_draws().is_none());
        assert_ne!(model.call_option().unwrap(), before);
    }

    #[test]
    fn test_strike_change_keeps_paths() {
        let mut model = small_model();
        let before = model.call_option().unwrap();
        let draws = Arc::clone(model.cached_draws().unwrap());

        model.set_strike(100.0).unwrap();

        assert!(Arc::ptr_eq(model.cached_draws().unwrap(), &draws));
        assert_eq!(model.cached_steps(), 37);
        assert!(model.call_option().unwrap() > before);
    }

    #[test]
    fn test_noop_set_keeps_everything() {
        let mut model = small_model();
        model.call_option().unwrap();
        model.set_rate(0.05).unwrap();
        assert_eq!(model.cached_steps(), 37);
    }

    #[test]
    fn test_failed_set_leaves_model_unchanged() {
        let mut model = small_model();
        model.call_option().unwrap();

        assert!(model.set_volatility(-0.2).is_err());
        assert!(model.set_paths(0).is_err());

        assert_eq!(*model.params(), small_model().params);
        assert_eq!(model.cached_steps(), 37);
    }

    #[test]
    fn test_call_matches_manual_aggregation() {
        let mut model = small_model();
        let terminal = model.terminal_prices().unwrap().to_vec();
        let manual = terminal
            .iter()
            .map(|&s| (s - 110.0_f64).max(0.0))
            .sum::<f64>()
            / terminal.len() as f64
            * (-0.05_f64 * 3.0).exp();

        assert_relative_eq!(model.call_option().unwrap(), manual, epsilon = 1e-10);
    }

    #[test]
    fn test_evaluate_quantities() {
        let mut model = small_model();
        assert_eq!(
            model.evaluate(Quantity::Step(0)).unwrap().as_vector().unwrap().len(),
            500
        );
        let call = model.evaluate(Quantity::CallOption).unwrap();
        assert_eq!(call.as_scalar(), Some(model.call_option().unwrap()));

        let bs = model.evaluate(Quantity::BlackScholesCall).unwrap();
        assert_relative_eq!(bs.as_scalar().unwrap(), 16.210871364283975, epsilon = 1e-10);
        assert!(model.evaluate(Quantity::PutOption).unwrap().as_scalar().is_some());
        assert!(model.evaluate(Quantity::BlackScholesPut).unwrap().as_scalar().is_some());
    }

    #[test]
    fn test_derive_shares_draws_when_shape_unchanged() {
        let mut model = small_model();
        model.call_option().unwrap();

        let overrides = Overrides::new().with(Parameter::Volatility, 0.3);
        let derived = model.derive(&overrides).unwrap();

        assert!(Arc::ptr_eq(
            derived.cached_draws().unwrap(),
            model.cached_draws().unwrap()
        ));
        assert_eq!(derived.cached_steps(), 0);
    }

    #[test]
    fn test_derive_with_new_shape_gets_own_draws() {
        let mut model = small_model();
        model.call_option().unwrap();

        let overrides = Overrides::new().with(Parameter::Steps, 12.0);
        let mut derived = model.derive(&overrides).unwrap();
        assert!(derived.cached_draws().is_none());
        assert_eq!(derived.draw_matrix().unwrap().n_steps(), 12);
        assert_eq!(model.cached_draws().unwrap().n_steps(), 36);
    }

    #[test]
    fn test_evaluate_with_leaves_baseline_cache() {
        let mut model = small_model();
        let baseline = model.call_option().unwrap();
        let terminal = model.terminal_prices().unwrap().to_vec();

        let overrides = Overrides::new()
            .with(Parameter::Rate, 0.03)
            .with(Parameter::Volatility, 0.15);
        let scenario = model
            .evaluate_with(&overrides, Quantity::CallOption)
            .unwrap();

        assert_ne!(scenario.as_scalar().unwrap(), baseline);
        assert_eq!(model.cached_steps(), 37);
        assert_eq!(model.terminal_prices().unwrap(), &terminal[..]);
        assert_eq!(model.call_option().unwrap(), baseline);
    }

    #[test]
    fn test_derived_equals_fresh_model() {
        let mut model = small_model();
        model.call_option().unwrap();

        let overrides = Overrides::new().with(Parameter::Spot, 95.0);
        let from_derive = model
            .evaluate_with(&overrides, Quantity::CallOption)
            .unwrap();

        let mut fresh = Model::new(model.params().with_overrides(&overrides).unwrap()).unwrap();
        assert_eq!(from_derive.as_scalar(), Some(fresh.call_option().unwrap()));
    }

    #[test]
    fn test_derive_rejects_invalid_override() {
        let model = small_model();
        let overrides = Overrides::new().with(Parameter::Volatility, -1.0);
        assert!(model.derive(&overrides).is_err());
    }

    #[test]
    fn test_set_seed_between_nearby_large_seeds() {
        let mut model = Model::new(ParameterSet {
            seed: 1 << 53,
            ..small_model().params
        })
        .unwrap();
        model.call_option().unwrap();
        let old_draws = Arc::clone(model.cached_draws().unwrap());

        model.set_seed((1 << 53) + 1).unwrap();
        assert_eq!(model.params().seed, (1 << 53) + 1);
        assert!(model.cached_draws().is_none());
        assert_eq!(model.cached_steps(), 0);

        let new_draws = model.draw_matrix().unwrap();
        assert_eq!(new_draws.seed(), (1 << 53) + 1);
        assert!(!Arc::ptr_eq(&old_draws, &new_draws));
    }
}
