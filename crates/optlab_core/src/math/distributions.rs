//! Standard normal distribution functions.
//!
//! Thin wrapper over `statrs` so that pricing code reads like the formulas
//! it implements. `statrs` evaluates Φ through its `erfc` approximation,
//! accurate to about 1e-11 absolute.

use statrs::distribution::{ContinuousCDF, Normal};

/// Standard normal cumulative distribution function, Φ(x) = P(X <= x).
///
/// # Examples
/// ```
/// use optlab_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!(norm_cdf(-3.0) < 0.01);
/// assert!(norm_cdf(3.0) > 0.99);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_norm_cdf_known_values() {
        assert_relative_eq!(norm_cdf(1.0), 0.841_344_746_068_542_9, epsilon = 1e-10);
        assert_relative_eq!(norm_cdf(-1.0), 0.158_655_253_931_457_05, epsilon = 1e-10);
        assert_relative_eq!(norm_cdf(1.959_963_984_540_054), 0.975, epsilon = 1e-10);
    }

    #[test]
    fn test_norm_cdf_tails() {
        assert!(norm_cdf(-40.0) >= 0.0);
        assert!(norm_cdf(-40.0) < 1e-300);
        assert_relative_eq!(norm_cdf(40.0), 1.0);
    }

    proptest! {
        #[test]
        fn test_norm_cdf_symmetry(x in -8.0f64..8.0) {
            prop_assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-12);
        }

        #[test]
        fn test_norm_cdf_monotone(x in -8.0f64..8.0, dx in 0.001f64..1.0) {
            prop_assert!(norm_cdf(x + dx) >= norm_cdf(x));
        }
    }
}
