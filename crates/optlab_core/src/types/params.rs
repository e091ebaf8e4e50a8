//! Named parameter set for the option-pricing pipeline.
//!
//! [`ParameterSet`] is the explicit context every computation reads from.
//! Parameters are addressed by name through [`Parameter`], and transient
//! what-if substitutions are expressed as [`Overrides`], which always produce
//! a new parameter set rather than mutating an existing one.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Seed used for the random draw matrix unless configured otherwise.
pub const DEFAULT_SEED: u64 = 1234;

/// Scalar inputs of the pricing pipeline.
///
/// The defaults are the reference case: a 3-year call struck at 110 on a
/// spot of 100, simulated over 10,000 paths with 36 monthly steps.
///
/// # Examples
///
/// ```rust
/// use optlab_core::types::ParameterSet;
///
/// let params = ParameterSet {
///     strike: 100.0,
///     ..ParameterSet::default()
/// };
/// assert!(params.validate().is_ok());
/// assert!((params.dt() - 3.0 / 36.0).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Number of simulated paths (M).
    pub n_paths: usize,
    /// Time to maturity in years (T).
    pub maturity: f64,
    /// Number of time steps (N).
    pub n_steps: usize,
    /// Initial spot price (S0).
    pub spot: f64,
    /// Risk-free rate, annualised (r).
    pub rate: f64,
    /// Volatility, annualised (sigma).
    pub volatility: f64,
    /// Strike price (K).
    pub strike: f64,
    /// Seed of the random draw matrix.
    pub seed: u64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            maturity: 3.0,
            n_steps: 36,
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            strike: 110.0,
            seed: DEFAULT_SEED,
        }
    }
}

impl ParameterSet {
    /// Validates every parameter against its domain.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if:
    /// - `n_paths` or `n_steps` is 0
    /// - `maturity`, `spot` or `strike` is not strictly positive and finite
    /// - `volatility` is negative or not finite
    /// - `rate` is not finite
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.n_paths == 0 {
            return Err(PricingError::invalid("M", "path count must be positive"));
        }
        if self.n_steps == 0 {
            return Err(PricingError::invalid("N", "step count must be positive"));
        }
        check_positive("T", self.maturity)?;
        check_positive("S0", self.spot)?;
        check_positive("K", self.strike)?;
        if !self.rate.is_finite() {
            return Err(PricingError::invalid(
                "r",
                format!("must be finite, got {}", self.rate),
            ));
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(PricingError::invalid(
                "sigma",
                format!("must be non-negative and finite, got {}", self.volatility),
            ));
        }
        Ok(())
    }

    /// Length of one time step, `T / N`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.maturity / self.n_steps as f64
    }

    /// Discount factor to maturity, `exp(-r T)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Returns the value of a named parameter as `f64`.
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Paths => self.n_paths as f64,
            Parameter::Maturity => self.maturity,
            Parameter::Steps => self.n_steps as f64,
            Parameter::Spot => self.spot,
            Parameter::Rate => self.rate,
            Parameter::Volatility => self.volatility,
            Parameter::Strike => self.strike,
            Parameter::Seed => self.seed as f64,
        }
    }

    /// Assigns a named parameter in place.
    ///
    /// Integer parameters (`M`, `N`, `seed`) only accept whole,
    /// non-negative values. Domain checks are left to [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if an integer parameter
    /// receives a fractional, negative or non-finite value.
    pub fn assign(&mut self, parameter: Parameter, value: f64) -> Result<(), PricingError> {
        match parameter {
            Parameter::Paths => self.n_paths = to_usize(parameter, value)?,
            Parameter::Maturity => self.maturity = value,
            Parameter::Steps => self.n_steps = to_usize(parameter, value)?,
            Parameter::Spot => self.spot = value,
            Parameter::Rate => self.rate = value,
            Parameter::Volatility => self.volatility = value,
            Parameter::Strike => self.strike = value,
            Parameter::Seed => self.seed = to_count(parameter, value)?,
        }
        Ok(())
    }

    /// Derives a validated parameter set with the overrides applied.
    ///
    /// `self` is left untouched (copy-on-override).
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if the derived set is invalid.
    pub fn with_overrides(&self, overrides: &Overrides) -> Result<ParameterSet, PricingError> {
        let mut derived = *self;
        for (parameter, value) in overrides.iter() {
            derived.assign(parameter, value)?;
        }
        derived.validate()?;
        Ok(derived)
    }

    /// Returns the parameters whose values differ between `self` and `other`.
    pub fn changed(&self, other: &ParameterSet) -> Vec<Parameter> {
        Parameter::ALL
            .iter()
            .copied()
            .filter(|&p| self.differs(other, p))
            .collect()
    }

    /// Integer parameters compare exactly; real ones compare by bit pattern.
    fn differs(&self, other: &ParameterSet, parameter: Parameter) -> bool {
        match parameter {
            Parameter::Paths => self.n_paths != other.n_paths,
            Parameter::Steps => self.n_steps != other.n_steps,
            Parameter::Seed => self.seed != other.seed,
            real => self.get(real).to_bits() != other.get(real).to_bits(),
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(
            name,
            format!("must be strictly positive and finite, got {}", value),
        ))
    }
}

// `u64::MAX as f64` rounds up to 2^64, so the bound is exclusive.
fn to_count(parameter: Parameter, value: f64) -> Result<u64, PricingError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(PricingError::invalid(
            parameter.symbol(),
            format!("must be a whole non-negative number, got {}", value),
        ))
    }
}

fn to_usize(parameter: Parameter, value: f64) -> Result<usize, PricingError> {
    let count = to_count(parameter, value)?;
    usize::try_from(count).map_err(|_| {
        PricingError::invalid(
            parameter.symbol(),
            format!("{} exceeds the platform limit of {}", count, usize::MAX),
        )
    })
}

/// Name of a scalar in a [`ParameterSet`].
///
/// Parses from the short symbols (`M`, `T`, `N`, `S0`, `r`, `sigma`, `K`,
/// `seed`) as well as the long field names (`n_paths`, `maturity`, ...).
///
/// # Examples
///
/// ```rust
/// use optlab_core::types::Parameter;
///
/// let p: Parameter = "sigma".parse().unwrap();
/// assert_eq!(p, Parameter::Volatility);
/// assert_eq!("volatility".parse::<Parameter>().unwrap(), p);
/// assert!("mu".parse::<Parameter>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    /// Path count (M).
    Paths,
    /// Maturity in years (T).
    Maturity,
    /// Step count (N).
    Steps,
    /// Initial spot (S0).
    Spot,
    /// Risk-free rate (r).
    Rate,
    /// Volatility (sigma).
    Volatility,
    /// Strike (K).
    Strike,
    /// Random draw seed.
    Seed,
}

impl Parameter {
    /// Every parameter, in declaration order.
    pub const ALL: [Parameter; 8] = [
        Parameter::Paths,
        Parameter::Maturity,
        Parameter::Steps,
        Parameter::Spot,
        Parameter::Rate,
        Parameter::Volatility,
        Parameter::Strike,
        Parameter::Seed,
    ];

    /// Short symbol used in formulas and on the command line.
    pub fn symbol(&self) -> &'static str {
        match self {
            Parameter::Paths => "M",
            Parameter::Maturity => "T",
            Parameter::Steps => "N",
            Parameter::Spot => "S0",
            Parameter::Rate => "r",
            Parameter::Volatility => "sigma",
            Parameter::Strike => "K",
            Parameter::Seed => "seed",
        }
    }

    /// Field name in serialised parameter sets.
    pub fn field_name(&self) -> &'static str {
        match self {
            Parameter::Paths => "n_paths",
            Parameter::Maturity => "maturity",
            Parameter::Steps => "n_steps",
            Parameter::Spot => "spot",
            Parameter::Rate => "rate",
            Parameter::Volatility => "volatility",
            Parameter::Strike => "strike",
            Parameter::Seed => "seed",
        }
    }

    /// Whether the random draw matrix depends on this parameter.
    #[inline]
    pub fn affects_draws(&self) -> bool {
        matches!(self, Parameter::Paths | Parameter::Steps | Parameter::Seed)
    }

    /// Whether the simulated price paths depend on this parameter.
    ///
    /// Only the strike is excluded: it enters the payoff, not the paths.
    #[inline]
    pub fn affects_paths(&self) -> bool {
        !matches!(self, Parameter::Strike)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Parameter {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Parameter::ALL
            .iter()
            .copied()
            .find(|p| p.symbol() == name || p.field_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| PricingError::UnknownParameter(name.to_string()))
    }
}

/// A set of transient parameter substitutions.
///
/// Assigning the same parameter twice keeps the last value. Two override
/// sets are equal (and hash equally) when they assign bit-identical values
/// to the same parameters, so they can key a cache of derived contexts.
///
/// # Examples
///
/// ```rust
/// use optlab_core::types::{Overrides, Parameter};
///
/// let parsed: Overrides = "r=0.03, sigma=0.15".parse().unwrap();
/// let built = Overrides::new()
///     .with(Parameter::Volatility, 0.15)
///     .with(Parameter::Rate, 0.03);
///
/// assert_eq!(parsed, built);
/// assert_eq!(parsed.to_string(), "r=0.03,sigma=0.15");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    values: BTreeMap<Parameter, f64>,
}

impl Overrides {
    /// Creates an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a substitution, builder style.
    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        self.set(parameter, value);
        self
    }

    /// Adds a substitution.
    pub fn set(&mut self, parameter: Parameter, value: f64) {
        self.values.insert(parameter, value);
    }

    /// Returns the substituted value for a parameter, if any.
    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values.get(&parameter).copied()
    }

    /// Whether no parameter is substituted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of substituted parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over substitutions in parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        self.values.iter().map(|(&p, &v)| (p, v))
    }

    /// Whether any substitution invalidates the random draws.
    pub fn affects_draws(&self) -> bool {
        self.values.keys().any(Parameter::affects_draws)
    }
}

impl PartialEq for Overrides {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((p1, v1), (p2, v2))| p1 == p2 && v1.to_bits() == v2.to_bits())
    }
}

impl Eq for Overrides {}

impl Hash for Overrides {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (parameter, value) in self.iter() {
            parameter.hash(state);
            value.to_bits().hash(state);
        }
    }
}

impl fmt::Display for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (parameter, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", parameter, value)?;
        }
        Ok(())
    }
}

impl FromStr for Overrides {
    type Err = PricingError;

    /// Parses `name=value` pairs separated by commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut overrides = Overrides::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = parse_assignment(pair)?;
            overrides.set(name, value);
        }
        Ok(overrides)
    }
}

/// Parses a single `name=value` assignment.
///
/// # Errors
///
/// Returns `PricingError::UnknownParameter` for an unknown name and
/// `PricingError::InvalidParameter` for a malformed assignment or value.
pub fn parse_assignment(pair: &str) -> Result<(Parameter, f64), PricingError> {
    let (name, raw) = pair.split_once('=').ok_or_else(|| {
        PricingError::invalid("assignment", format!("expected NAME=VALUE, got '{}'", pair))
    })?;
    let parameter: Parameter = name.parse()?;
    let value = raw.trim().parse::<f64>().map_err(|_| {
        PricingError::invalid(
            parameter.symbol(),
            format!("'{}' is not a number", raw.trim()),
        )
    })?;
    Ok((parameter, value))
}
