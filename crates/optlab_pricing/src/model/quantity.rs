//! Named computed quantities and their values.

use std::fmt;
use std::str::FromStr;

use optlab_core::types::PricingError;
use serde::Serialize;

/// A quantity that a [`Model`](super::Model) can compute on request.
///
/// # Examples
///
/// ```rust
/// use optlab_pricing::model::Quantity;
///
/// assert_eq!("S(12)".parse::<Quantity>().unwrap(), Quantity::Step(12));
/// assert_eq!("CallOption".parse::<Quantity>().unwrap(), Quantity::CallOption);
/// assert_eq!(Quantity::BlackScholesCall.to_string(), "BlackScholesCall");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Simulated price vector at a time step, `S(i)`.
    Step(usize),
    /// Monte Carlo European call price.
    CallOption,
    /// Monte Carlo European put price.
    PutOption,
    /// Closed-form European call price.
    BlackScholesCall,
    /// Closed-form European put price.
    BlackScholesPut,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Step(i) => write!(f, "S({})", i),
            Quantity::CallOption => f.write_str("CallOption"),
            Quantity::PutOption => f.write_str("PutOption"),
            Quantity::BlackScholesCall => f.write_str("BlackScholesCall"),
            Quantity::BlackScholesPut => f.write_str("BlackScholesPut"),
        }
    }
}

impl FromStr for Quantity {
    type Err = PricingError;

    /// Accepts `S(i)`, `S i` or `Si` for price steps and the quantity names
    /// in either their display form or lower case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let unknown = || PricingError::UnknownQuantity(name.to_string());

        if let Some(rest) = name.strip_prefix('S').or_else(|| name.strip_prefix('s')) {
            let rest = rest.trim();
            let index = rest
                .strip_prefix('(')
                .and_then(|inner| inner.strip_suffix(')'))
                .unwrap_or(rest)
                .trim();
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                return index.parse().map(Quantity::Step).map_err(|_| unknown());
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "calloption" | "call" => Ok(Quantity::CallOption),
            "putoption" | "put" => Ok(Quantity::PutOption),
            "blackscholescall" | "bs-call" => Ok(Quantity::BlackScholesCall),
            "blackscholesput" | "bs-put" => Ok(Quantity::BlackScholesPut),
            _ => Err(unknown()),
        }
    }
}

/// Result of evaluating a [`Quantity`]: a price or a per-path vector.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A single number (option prices).
    Scalar(f64),
    /// One entry per simulated path (`S(i)`).
    Vector(Vec<f64>),
}

impl Value {
    /// Returns the scalar, if this is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Vector(_) => None,
        }
    }

    /// Returns the per-path vector, if this is one.
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Scalar(_) => None,
            Value::Vector(v) => Some(v),
        }
    }
}
