//! Numerical integration.
//!
//! - [`AdaptiveGaussKronrod`]: globally adaptive 7/15-point Gauss–Kronrod with
//!   optional breakpoints
//! - [`trapezoid`]: composite trapezoidal rule on sampled data
//! - [`QuadratureConfig`]: tolerances and subdivision budget

mod config;
mod gauss_kronrod;
mod trapezoid;

pub use config::QuadratureConfig;
pub use gauss_kronrod::{AdaptiveGaussKronrod, QuadratureResult};
pub use trapezoid::trapezoid;
