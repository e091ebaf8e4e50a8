//! Black-Scholes pricing for European options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! Unlike a smoothed pricer, zero volatility or zero expiry is an error
//! here: d₁ has σ√T in its denominator.

use optlab_core::math::norm_cdf;
use optlab_core::types::{ParameterSet, PricingError};

/// Black-Scholes model for European option pricing.
///
/// # Examples
/// ```
/// use optlab_pricing::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call = bs.price_call(110.0, 3.0).unwrap();
/// assert!((call - 16.210871364283975).abs() < 1e-10);
///
/// // Put-call parity: C - P = S - K·exp(-rT)
/// let put = bs.price_put(110.0, 3.0).unwrap();
/// let parity = call - put - (100.0 - 110.0 * (-0.15_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes model.
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` if spot is not strictly positive,
    ///   volatility is negative, or any input is not finite
    /// - `PricingError::DivisionByZero` if volatility is zero
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, PricingError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(PricingError::invalid(
                "S0",
                format!("must be strictly positive, got {}", spot),
            ));
        }
        if !rate.is_finite() {
            return Err(PricingError::invalid("r", format!("must be finite, got {}", rate)));
        }
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(PricingError::invalid(
                "sigma",
                format!("must be non-negative, got {}", volatility),
            ));
        }
        if volatility == 0.0 {
            return Err(PricingError::DivisionByZero { name: "sigma" });
        }

        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Builds the model from a parameter set.
    ///
    /// # Errors
    /// Same as [`BlackScholes::new`].
    pub fn from_params(params: &ParameterSet) -> Result<Self, PricingError> {
        Self::new(params.spot, params.rate, params.volatility)
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Computes d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T).
    ///
    /// # Errors
    /// - `PricingError::InvalidParameter` for a non-positive strike or a
    ///   negative expiry
    /// - `PricingError::DivisionByZero` for a zero expiry
    pub fn d1(&self, strike: f64, expiry: f64) -> Result<f64, PricingError> {
        check_contract(strike, expiry)?;

        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let log_moneyness = (self.spot / strike).ln();
        let drift = (self.rate + 0.5 * self.volatility * self.volatility) * expiry;

        Ok((log_moneyness + drift) / vol_sqrt_t)
    }

    /// Computes d₂ = d₁ - σ√T.
    ///
    /// # Errors
    /// Same as [`d1`](Self::d1).
    pub fn d2(&self, strike: f64, expiry: f64) -> Result<f64, PricingError> {
        Ok(self.d1(strike, expiry)? - self.volatility * expiry.sqrt())
    }

    /// Computes the European call price, C = S·N(d₁) - K·e^(-rT)·N(d₂).
    ///
    /// # Errors
    /// Same as [`d1`](Self::d1).
    pub fn price_call(&self, strike: f64, expiry: f64) -> Result<f64, PricingError> {
        let d1 = self.d1(strike, expiry)?;
        let d2 = d1 - self.volatility * expiry.sqrt();
        let discount = (-self.rate * expiry).exp();

        Ok(self.spot * norm_cdf(d1) - strike * discount * norm_cdf(d2))
    }

    /// Computes the European put price, P = K·e^(-rT)·N(-d₂) - S·N(-d₁).
    ///
    /// # Errors
    /// Same as [`d1`](Self::d1).
    pub fn price_put(&self, strike: f64, expiry: f64) -> Result<f64, PricingError> {
        let d1 = self.d1(strike, expiry)?;
        let d2 = d1 - self.volatility * expiry.sqrt();
        let discount = (-self.rate * expiry).exp();

        Ok(strike * discount * norm_cdf(-d2) - self.spot * norm_cdf(-d1))
    }
}

fn check_contract(strike: f64, expiry: f64) -> Result<(), PricingError> {
    if !(strike.is_finite() && strike > 0.0) {
        return Err(PricingError::invalid(
            "K",
            format!("must be strictly positive, got {}", strike),
        ));
    }
    if !(expiry.is_finite() && expiry >= 0.0) {
        return Err(PricingError::invalid(
            "T",
            format!("must be non-negative, got {}", expiry),
        ));
    }
    if expiry == 0.0 {
        return Err(PricingError::DivisionByZero { name: "T" });
    }
    Ok(())
}

/// Closed-form call price for a parameter set.
///
/// # Errors
/// - `PricingError::DivisionByZero` if sigma or T is zero
/// - `PricingError::InvalidParameter` for out-of-domain inputs
pub fn black_scholes_call(params: &ParameterSet) -> Result<f64, PricingError> {
    BlackScholes::from_params(params)?.price_call(params.strike, params.maturity)
}

/// Closed-form put price for a parameter set.
///
/// # Errors
/// Same as [`black_scholes_call`].
pub fn black_scholes_put(params: &ParameterSet) -> Result<f64, PricingError> {
    BlackScholes::from_params(params)?.price_put(params.strike, params.maturity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reference_call_price() {
        let price = black_scholes_call(&ParameterSet::default()).unwrap();
        assert_relative_eq!(price, 16.210871364283975, epsilon = 1e-10);
    }

    #[test]
    fn test_override_reference_prices() {
        let low = ParameterSet {
            rate: 0.03,
            volatility: 0.15,
            ..ParameterSet::default()
        };
        assert_relative_eq!(black_scholes_call(&low).unwrap(), 10.099199582381928, epsilon = 1e-9);

        let high = ParameterSet {
            rate: 0.06,
            volatility: 0.4,
            ..ParameterSet::default()
        };
        assert_relative_eq!(black_scholes_call(&high).unwrap(), 30.24274009595205, epsilon = 1e-9);
    }

    #[test]
    fn test_d1_d2_relationship() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
        let d1 = bs.d1(110.0, 3.0).unwrap();
        let d2 = bs.d2(110.0, 3.0).unwrap();
        assert_relative_eq!(d1 - d2, 0.2 * 3.0_f64.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_zero_volatility_is_division_by_zero() {
        assert_eq!(
            BlackScholes::new(100.0, 0.05, 0.0),
            Err(PricingError::DivisionByZero { name: "sigma" })
        );
        let params = ParameterSet {
            volatility: 0.0,
            ..ParameterSet::default()
        };
        assert_eq!(
            black_scholes_call(&params),
            Err(PricingError::DivisionByZero { name: "sigma" })
        );
    }

    #[test]
    fn test_zero_expiry_is_division_by_zero() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
        assert_eq!(
            bs.price_call(110.0, 0.0),
            Err(PricingError::DivisionByZero { name: "T" })
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            BlackScholes::new(-100.0, 0.05, 0.2),
            Err(PricingError::InvalidParameter { name: "S0", .. })
        ));
        assert!(matches!(
            BlackScholes::new(100.0, 0.05, -0.2),
            Err(PricingError::InvalidParameter { name: "sigma", .. })
        ));
        let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
        assert!(matches!(
            bs.price_call(0.0, 1.0),
            Err(PricingError::InvalidParameter { name: "K", .. })
        ));
        assert!(matches!(
            bs.price_call(100.0, -1.0),
            Err(PricingError::InvalidParameter { name: "T", .. })
        ));
    }

    #[test]
    fn test_put_reference_price() {
        // Parity with the reference call
        let put = black_scholes_put(&ParameterSet::default()).unwrap();
        let expected = 16.210871364283975 - 100.0 + 110.0 * (-0.15_f64).exp();
        assert_relative_eq!(put, expected, epsilon = 1e-10);
    }

    proptest! {
        #[test]
        fn test_call_bounds(
            spot in 10.0f64..300.0,
            strike in 10.0f64..300.0,
            rate in 0.0f64..0.1,
            volatility in 0.01f64..1.0,
            expiry in 0.05f64..5.0,
        ) {
            let bs = BlackScholes::new(spot, rate, volatility).unwrap();
            let call = bs.price_call(strike, expiry).unwrap();
            let lower = (spot - strike * (-rate * expiry).exp()).max(0.0);

            prop_assert!(call >= lower - 1e-9);
            prop_assert!(call <= spot + 1e-9);
        }

        #[test]
        fn test_put_call_parity(
            spot in 10.0f64..300.0,
            strike in 10.0f64..300.0,
            rate in -0.02f64..0.1,
            volatility in 0.01f64..1.0,
            expiry in 0.05f64..5.0,
        ) {
            let bs = BlackScholes::new(spot, rate, volatility).unwrap();
            let call = bs.price_call(strike, expiry).unwrap();
            let put = bs.price_put(strike, expiry).unwrap();
            let forward = spot - strike * (-rate * expiry).exp();

            prop_assert!((call - put - forward).abs() < 1e-8 * spot.max(strike));
        }
    }
}
