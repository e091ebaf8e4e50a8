//! # Random Number Generation
//!
//! Seeded pseudo-random number generation for the draw matrix.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: Every generator is created from an explicit seed;
//!   the same seed yields a bit-identical sequence
//! - **Efficiency**: Batch operations fill caller-owned `&mut [f64]` slices
//!
//! ## Usage Example
//!
//! ```rust
//! use optlab_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::from_seed(1234);
//!
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::PricerRng;
