//! Core parameter and error types.
//!
//! This module provides:
//! - `params`: The parameter set, parameter names and override sets
//! - `error`: Structured error types for pricing operations

pub mod error;
pub mod params;

pub use error::PricingError;
pub use params::{parse_assignment, Overrides, Parameter, ParameterSet, DEFAULT_SEED};
