//! # optlab_core: Foundation for the optlab pricing workspace
//!
//! ## Role
//!
//! optlab_core is the bottom layer of the workspace, providing:
//! - The named parameter set driving every computation (`types::params`)
//! - Transient parameter substitutions for what-if queries (`types::params::Overrides`)
//! - Error types: `PricingError` (`types::error`)
//! - Standard normal distribution functions (`math::distributions`)
//!
//! ## Minimal Dependency Principle
//!
//! This crate has no dependencies on other optlab crates:
//! - statrs: Standard normal CDF/PDF
//! - thiserror: Error derivation
//! - serde: Serialisation of parameter sets
//!
//! ## Usage Examples
//!
//! ```rust
//! use optlab_core::types::{Overrides, Parameter, ParameterSet};
//!
//! let base = ParameterSet::default();
//! assert_eq!(base.n_steps, 36);
//!
//! let overrides = Overrides::new()
//!     .with(Parameter::Rate, 0.03)
//!     .with(Parameter::Volatility, 0.15);
//! let scenario = base.with_overrides(&overrides).unwrap();
//!
//! assert_eq!(scenario.rate, 0.03);
//! // The baseline is a value; deriving never touches it
//! assert_eq!(base.rate, 0.05);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod math;
pub mod types;
