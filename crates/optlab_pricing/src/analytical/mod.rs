//! Analytical (closed-form) solutions for option pricing.
//!
//! Used to validate Monte Carlo prices: a Monte Carlo estimate of a
//! European call should converge to [`black_scholes_call`] as the path
//! count grows.

pub mod black_scholes;

pub use black_scholes::{black_scholes_call, black_scholes_put, BlackScholes};
