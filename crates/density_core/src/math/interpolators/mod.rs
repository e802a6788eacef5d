//! Spline interpolation and smoothing.
//!
//! ## Available Interpolators
//!
//! - [`BSpline`]: Immutable B-spline curve with value and derivative evaluation
//! - [`SmoothingSpline`]: Penalised fit of a `BSpline` to a target residual
//!
//! ## Core Trait
//!
//! Interpolants implement the [`Interpolator`] trait, which defines:
//! - `interpolate(x) -> Result<f64, InterpolationError>`: Compute interpolated value
//! - `domain() -> (f64, f64)`: Return valid interpolation range
//!
//! Queries outside the domain fail with `OutOfBounds`; nothing extrapolates.
//!
//! ## Example
//!
//! ```
//! use density_core::math::interpolators::{BSpline, Interpolator};
//!
//! let xs = [0.0, 1.0, 2.0, 3.0];
//! let ys = [0.0, 1.0, 4.0, 9.0];
//!
//! let spline = BSpline::interpolating(&xs, &ys, 3).unwrap();
//! assert_eq!(spline.domain(), (0.0, 3.0));
//! assert!((spline.interpolate(1.5).unwrap() - 2.25).abs() < 1e-12);
//! ```

mod bspline;
mod smoothing_spline;
mod traits;

pub use bspline::{BSpline, MAX_DEGREE};
pub use smoothing_spline::{SmoothingFit, SmoothingSpline};
pub use traits::Interpolator;
