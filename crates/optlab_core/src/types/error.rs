//! Error types for structured error handling.
//!
//! Every failure in the pricing pipeline is a local input-validation
//! failure: it is raised before any partial result is produced and is
//! never retried.

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidParameter`: A parameter violates its domain (e.g. `N = 0`)
/// - `DivisionByZero`: Closed-form pricing with zero volatility or maturity
/// - `EmptyPathSet`: Aggregation over zero simulated paths
/// - `StepOutOfRange`: Price requested beyond the final time step
/// - `UnknownParameter`: A parameter name that does not exist
/// - `UnknownQuantity`: A computed quantity name that does not exist
///
/// # Examples
/// ```
/// use optlab_core::types::PricingError;
///
/// let err = PricingError::invalid("sigma", "must be non-negative, got -0.1");
/// assert_eq!(
///     format!("{}", err),
///     "Invalid parameter 'sigma': must be non-negative, got -0.1"
/// );
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    /// A parameter is outside its valid domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the violation
        reason: String,
    },

    /// A closed-form denominator vanished.
    #[error("Division by zero: {name} must be strictly positive")]
    DivisionByZero {
        /// Name of the parameter that is zero
        name: &'static str,
    },

    /// Averaging over an empty set of paths.
    #[error("Empty path set: cannot average a payoff over zero paths")]
    EmptyPathSet,

    /// Step index beyond the simulation horizon.
    #[error("Step {step} out of range: valid steps are 0..={n_steps}")]
    StepOutOfRange {
        /// Requested step index
        step: usize,
        /// Number of time steps in the simulation
        n_steps: usize,
    },

    /// Unrecognised parameter name.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Unrecognised computed quantity.
    #[error("Unknown quantity: {0}")]
    UnknownQuantity(String),
}

impl PricingError {
    /// Shorthand for [`PricingError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PricingError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
