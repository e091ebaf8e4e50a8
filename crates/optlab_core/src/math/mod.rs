//! Mathematical helpers shared by the pricing layers.

pub mod distributions;

pub use distributions::norm_cdf;
