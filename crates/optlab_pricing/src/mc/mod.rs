//! Monte Carlo building blocks.
//!
//! # Architecture
//!
//! ```text
//! ParameterSet
//! ├── DrawMatrix     (N×M standard normals, fixed seed)
//! ├── PathCache      (memoised S(0)..=S(N))
//! └── discounted_payoff()
//!     └── PricingResult (price, standard error)
//! ```
//!
//! These pieces are stateless apart from the caches they own; the
//! [`Model`](crate::model::Model) context decides when each cache is valid.
//!
//! # Example
//!
//! ```rust
//! use optlab_core::types::ParameterSet;
//! use optlab_pricing::mc::{discounted_call_payoff, DrawMatrix, PathCache};
//!
//! let params = ParameterSet { n_paths: 2_000, ..ParameterSet::default() };
//! let draws = DrawMatrix::generate(params.n_steps, params.n_paths, params.seed).unwrap();
//!
//! let mut paths = PathCache::new();
//! let terminal = paths.terminal(&params, &draws).unwrap();
//! let result = discounted_call_payoff(terminal, params.strike, params.rate, params.maturity).unwrap();
//!
//! assert!(result.price > 0.0);
//! ```

pub mod draws;
pub mod paths;
pub mod payoff;

pub use draws::DrawMatrix;
pub use paths::{advance, GbmIncrement, PathCache};
pub use payoff::{
    discounted_call_payoff, discounted_payoff, discounted_put_payoff, PayoffType, PricingResult,
};
