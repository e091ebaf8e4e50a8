//! Terminal payoffs and Monte Carlo aggregation.

use optlab_core::types::PricingError;
use serde::Serialize;

/// Vanilla payoff at maturity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoffType {
    /// max(S(N) - K, 0)
    Call,
    /// max(K - S(N), 0)
    Put,
}

impl PayoffType {
    /// Payoff of a single terminal price.
    #[inline]
    pub fn payoff(&self, terminal: f64, strike: f64) -> f64 {
        match self {
            PayoffType::Call => (terminal - strike).max(0.0),
            PayoffType::Put => (strike - terminal).max(0.0),
        }
    }
}

/// Monte Carlo price estimate.
///
/// # Examples
///
/// ```rust
/// use optlab_pricing::mc::PricingResult;
///
/// let result = PricingResult { price: 16.3, std_error: 0.26, n_paths: 10_000 };
/// assert!((result.confidence_95() - 0.5096).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PricingResult {
    /// Discounted mean payoff.
    pub price: f64,
    /// Standard error of the discounted mean.
    pub std_error: f64,
    /// Number of paths averaged.
    pub n_paths: usize,
}

impl PricingResult {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }
}

/// Discounted average payoff over a terminal price vector.
///
/// Computes `exp(-rT) × mean(payoff(S(N)))` and the standard error of
/// that estimate (sample standard deviation over √M; zero for a single
/// path).
///
/// # Errors
///
/// Returns `PricingError::EmptyPathSet` if `terminal` is empty.
pub fn discounted_payoff(
    terminal: &[f64],
    payoff: PayoffType,
    strike: f64,
    rate: f64,
    maturity: f64,
) -> Result<PricingResult, PricingError> {
    if terminal.is_empty() {
        return Err(PricingError::EmptyPathSet);
    }

    let n = terminal.len() as f64;
    let (sum, sum_sq) = terminal.iter().fold((0.0, 0.0), |(sum, sum_sq), &s| {
        let p = payoff.payoff(s, strike);
        (sum + p, sum_sq + p * p)
    });

    let mean = sum / n;
    let std_error = if terminal.len() > 1 {
        let variance = ((sum_sq - n * mean * mean) / (n - 1.0)).max(0.0);
        (variance / n).sqrt()
    } else {
        0.0
    };

    let discount = (-rate * maturity).exp();

    Ok(PricingResult {
        price: mean * discount,
        std_error: std_error * discount,
        n_paths: terminal.len(),
    })
}

/// Discounted average call payoff, `exp(-rT) × mean(max(S(N) - K, 0))`.
///
/// # Errors
///
/// Returns `PricingError::EmptyPathSet` if `terminal` is empty.
///
/// # Examples
///
/// ```rust
/// use optlab_pricing::mc::discounted_call_payoff;
///
/// let result = discounted_call_payoff(&[120.0, 100.0], 110.0, 0.0, 1.0).unwrap();
/// assert_eq!(result.price, 5.0);
///
/// assert!(discounted_call_payoff(&[], 110.0, 0.05, 3.0).is_err());
/// ```
pub fn discounted_call_payoff(
    terminal: &[f64],
    strike: f64,
    rate: f64,
    maturity: f64,
) -> Result<PricingResult, PricingError> {
    discounted_payoff(terminal, PayoffType::Call, strike, rate, maturity)
}

/// Discounted average put payoff, `exp(-rT) × mean(max(K - S(N), 0))`.
///
/// # Errors
///
/// Returns `PricingError::EmptyPathSet` if `terminal` is empty.
pub fn discounted_put_payoff(
    terminal: &[f64],
    strike: f64,
    rate: f64,
    maturity: f64,
) -> Result<PricingResult, PricingError> {
    discounted_payoff(terminal, PayoffType::Put, strike, rate, maturity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_call_payoff_values() {
        assert_eq!(PayoffType::Call.payoff(120.0, 110.0), 10.0);
        assert_eq!(PayoffType::Call.payoff(100.0, 110.0), 0.0);
        assert_eq!(PayoffType::Put.payoff(100.0, 110.0), 10.0);
        assert_eq!(PayoffType::Put.payoff(120.0, 110.0), 0.0);
    }

    #[test]
    fn test_discounting() {
        let terminal = [130.0, 90.0, 110.0, 150.0];
        let result = discounted_call_payoff(&terminal, 110.0, 0.05, 3.0).unwrap();

        let expected = (20.0 + 0.0 + 0.0 + 40.0) / 4.0 * (-0.15_f64).exp();
        assert_relative_eq!(result.price, expected, epsilon = 1e-12);
        assert_eq!(result.n_paths, 4);
    }

    #[test]
    fn test_standard_error() {
        // payoffs 0 and 2: sample variance 2, std error sqrt(2 / 2) = 1
        let result = discounted_call_payoff(&[100.0, 112.0], 110.0, 0.0, 1.0).unwrap();
        assert_relative_eq!(result.price, 1.0);
        assert_relative_eq!(result.std_error, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_path_has_zero_error() {
        let result = discounted_call_payoff(&[120.0], 110.0, 0.0, 1.0).unwrap();
        assert_eq!(result.std_error, 0.0);
    }

    #[test]
    fn test_empty_path_set() {
        assert_eq!(
            discounted_call_payoff(&[], 110.0, 0.05, 3.0),
            Err(PricingError::EmptyPathSet)
        );
        assert_eq!(
            discounted_put_payoff(&[], 110.0, 0.05, 3.0),
            Err(PricingError::EmptyPathSet)
        );
    }

    #[test]
    fn test_price_is_non_negative() {
        let result = discounted_call_payoff(&[50.0, 60.0, 70.0], 110.0, -0.02, 2.0).unwrap();
        assert_eq!(result.price, 0.0);
        assert_eq!(result.std_error, 0.0);
    }
}
