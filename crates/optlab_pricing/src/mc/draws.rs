//! Fixed-seed matrix of standard normal draws.
//!
//! # Memory Layout
//!
//! Draws are stored row-major with one row per time step:
//! `data[step * n_paths + path]`. Row `i` perturbs every path on the
//! transition from step `i` to step `i + 1`.

use optlab_core::types::PricingError;
use tracing::debug;

use crate::rng::PricerRng;

/// N×M matrix of independent standard normal samples.
///
/// Immutable once generated; contexts share it behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use optlab_pricing::mc::DrawMatrix;
///
/// let a = DrawMatrix::generate(36, 1000, 1234).unwrap();
/// let b = DrawMatrix::generate(36, 1000, 1234).unwrap();
///
/// assert_eq!(a.row(0).len(), 1000);
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DrawMatrix {
    data: Vec<f64>,
    n_steps: usize,
    n_paths: usize,
    seed: u64,
}

impl DrawMatrix {
    /// Generates the matrix from a fresh generator seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if `n_steps` or `n_paths` is 0.
    pub fn generate(n_steps: usize, n_paths: usize, seed: u64) -> Result<Self, PricingError> {
        if n_steps == 0 {
            return Err(PricingError::invalid("N", "step count must be positive"));
        }
        if n_paths == 0 {
            return Err(PricingError::invalid("M", "path count must be positive"));
        }

        let len = n_steps.checked_mul(n_paths).ok_or_else(|| {
            PricingError::invalid("M", format!("{} x {} draws overflow", n_steps, n_paths))
        })?;

        debug!(n_steps, n_paths, seed, "generating draw matrix");

        let mut rng = PricerRng::from_seed(seed);
        let mut data = vec![0.0; len];
        rng.fill_normal(&mut data);

        Ok(Self {
            data,
            n_steps,
            n_paths,
            seed,
        })
    }

    /// Number of rows (time steps).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of columns (paths).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Seed the matrix was generated from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether this matrix was generated for the given shape and seed.
    #[inline]
    pub fn matches(&self, n_steps: usize, n_paths: usize, seed: u64) -> bool {
        self.n_steps == n_steps && self.n_paths == n_paths && self.seed == seed
    }

    /// Draws for one time step, one entry per path.
    ///
    /// # Panics
    ///
    /// Panics if `step >= n_steps`.
    #[inline]
    pub fn row(&self, step: usize) -> &[f64] {
        let start = step * self.n_paths;
        &self.data[start..start + self.n_paths]
    }

    /// Single draw for (`step`, `path`), or `None` if out of range.
    #[inline]
    pub fn get(&self, step: usize, path: usize) -> Option<f64> {
        if step < self.n_steps && path < self.n_paths {
            Some(self.data[step * self.n_paths + path])
        } else {
            None
        }
    }

    /// The whole matrix in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
