//! Memoised Geometric Brownian Motion path simulation.
//!
//! Prices evolve with the log-space discretisation
//! ```text
//! S(i) = S(i-1) × exp((r - 0.5σ²)dt + σ ε(i-1) √dt),    S(0) = S0
//! ```
//! where `ε(i-1)` is row `i - 1` of the [`DrawMatrix`].
//!
//! Every step depends on the one before it, so [`PathCache`] keeps the whole
//! prefix `S(0)..=S(k)` it has computed and extends it on demand: asking for
//! `S(N)` costs N vector updates once, and every later request for any step
//! up to N is a lookup.

use optlab_core::types::{ParameterSet, PricingError};
use tracing::{debug, trace};

use super::draws::DrawMatrix;

/// Per-step GBM coefficients shared by every path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmIncrement {
    /// Drift term, `(r - 0.5σ²) dt`.
    pub drift: f64,
    /// Volatility, σ.
    pub volatility: f64,
    /// Square root of the step length, `√dt`.
    pub sqrt_dt: f64,
}

impl GbmIncrement {
    /// Derives the coefficients from a parameter set.
    #[inline]
    pub fn from_params(params: &ParameterSet) -> Self {
        let dt = params.dt();
        let sigma = params.volatility;
        Self {
            drift: (params.rate - 0.5 * sigma * sigma) * dt,
            volatility: sigma,
            sqrt_dt: dt.sqrt(),
        }
    }

    /// Growth factor for one path given its draw.
    #[inline]
    pub fn growth(&self, epsilon: f64) -> f64 {
        let diffusion = self.volatility * epsilon * self.sqrt_dt;
        (self.drift + diffusion).exp()
    }
}

/// Advances one price vector by a single time step.
///
/// # Panics
///
/// Debug builds assert that `previous` and `draws` have equal length.
pub fn advance(previous: &[f64], draws: &[f64], increment: &GbmIncrement) -> Vec<f64> {
    debug_assert_eq!(previous.len(), draws.len());
    previous
        .iter()
        .zip(draws)
        .map(|(&s, &eps)| s * increment.growth(eps))
        .collect()
}

/// Cache of simulated price vectors `S(0)..=S(k)` for one parameter set.
///
/// The cache remembers the parameters it was filled under; a request made
/// with parameters that change the paths (anything but the strike) discards
/// the cached prefix first.
///
/// # Examples
///
/// ```rust
/// use optlab_core::types::ParameterSet;
/// use optlab_pricing::mc::{DrawMatrix, PathCache};
///
/// let params = ParameterSet { n_paths: 100, ..ParameterSet::default() };
/// let draws = DrawMatrix::generate(params.n_steps, params.n_paths, params.seed).unwrap();
///
/// let mut cache = PathCache::new();
/// let s0 = cache.price_at_step(0, &params, &draws).unwrap();
/// assert!(s0.iter().all(|&s| s == 100.0));
///
/// cache.price_at_step(36, &params, &draws).unwrap();
/// assert_eq!(cache.cached_steps(), 37);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathCache {
    steps: Vec<Vec<f64>>,
    params: Option<ParameterSet>,
}

impl PathCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps currently cached (`k + 1` for a prefix `S(0)..=S(k)`).
    #[inline]
    pub fn cached_steps(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Discards every cached step.
    pub fn clear(&mut self) {
        if !self.steps.is_empty() {
            debug!(cached_steps = self.steps.len(), "clearing path cache");
        }
        self.steps.clear();
        self.params = None;
    }

    /// Returns the price vector at `step`, simulating any missing prefix.
    ///
    /// # Errors
    ///
    /// - `PricingError::StepOutOfRange` if `step > params.n_steps`
    /// - `PricingError::InvalidParameter` if `draws` does not have the
    ///   shape and seed of `params`
    pub fn price_at_step(
        &mut self,
        step: usize,
        params: &ParameterSet,
        draws: &DrawMatrix,
    ) -> Result<&[f64], PricingError> {
        if step > params.n_steps {
            return Err(PricingError::StepOutOfRange {
                step,
                n_steps: params.n_steps,
            });
        }
        if !draws.matches(params.n_steps, params.n_paths, params.seed) {
            return Err(PricingError::invalid(
                "N",
                format!(
                    "draw matrix is {}x{} (seed {}), parameters need {}x{} (seed {})",
                    draws.n_steps(),
                    draws.n_paths(),
                    draws.seed(),
                    params.n_steps,
                    params.n_paths,
                    params.seed
                ),
            ));
        }

        if !self.is_valid_for(params) {
            self.clear();
            self.params = Some(*params);
        }

        if self.steps.is_empty() {
            self.steps.push(vec![params.spot; params.n_paths]);
        }

        if self.steps.len() <= step {
            let increment = GbmIncrement::from_params(params);
            trace!(from = self.steps.len(), to = step, "extending path cache");
            while self.steps.len() <= step {
                let i = self.steps.len();
                let next = advance(&self.steps[i - 1], draws.row(i - 1), &increment);
                self.steps.push(next);
            }
        }

        Ok(&self.steps[step])
    }

    /// Terminal price vector `S(N)`.
    ///
    /// # Errors
    ///
    /// Same as [`price_at_step`](Self::price_at_step).
    pub fn terminal(
        &mut self,
        params: &ParameterSet,
        draws: &DrawMatrix,
    ) -> Result<&[f64], PricingError> {
        self.price_at_step(params.n_steps, params, draws)
    }

    fn is_valid_for(&self, params: &ParameterSet) -> bool {
        match &self.params {
            Some(cached) => cached.changed(params).iter().all(|p| !p.affects_paths()),
            None => false,
        }
    }
}
