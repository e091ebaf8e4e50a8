//! # optlab_pricing: Monte Carlo and closed-form option pricing
//!
//! ## Role
//!
//! optlab_pricing prices a European option two ways from one parameter set:
//! - Monte Carlo over Geometric Brownian Motion paths driven by a
//!   fixed-seed draw matrix (`mc`)
//! - Black-Scholes closed form, for validation (`analytical`)
//!
//! The [`model::Model`] context ties them together: it generates draws and
//! price steps lazily, memoises them, invalidates exactly what a parameter
//! change affects, and answers what-if queries in derived contexts that
//! leave the baseline untouched.
//!
//! ## Usage Example
//!
//! ```rust
//! use optlab_core::types::{Overrides, Parameter, ParameterSet};
//! use optlab_pricing::model::Model;
//!
//! let mut model = Model::new(ParameterSet::default()).unwrap();
//!
//! let mc = model.call_option().unwrap();
//! let bs = model.black_scholes_call().unwrap();
//! assert!((mc - bs).abs() / bs < 0.06);
//!
//! let low_vol = Overrides::new()
//!     .with(Parameter::Rate, 0.03)
//!     .with(Parameter::Volatility, 0.15);
//! let mut scenario = model.derive(&low_vol).unwrap();
//! assert!(scenario.call_option().unwrap() < mc);
//! ```
//!
//! ## Module Structure
//!
//! - [`rng`]: Seeded pseudo-random number generation
//! - [`mc`]: Draw matrix, memoised path cache, payoff aggregation
//! - [`analytical`]: Black-Scholes closed form
//! - [`model`]: Pricing context, named quantities, scenario spaces

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod analytical;
pub mod mc;
pub mod model;
pub mod rng;

pub use model::{Model, Quantity, Value};
