//! # density_core: Numerical Foundation for Risk-Neutral Density Extraction
//!
//! ## Role
//!
//! density_core is the bottom layer of the workspace, providing:
//! - B-spline curves and penalised smoothing splines (`math::interpolators`)
//! - Adaptive Gauss–Kronrod and trapezoidal integration (`math::quadrature`)
//! - Brent root finding (`math::solvers`)
//! - Dense LU/Cholesky solves (`math::linalg`)
//! - Closed-form Black-Scholes prices and the lognormal density (`analytical`)
//! - Error types: `InterpolationError`, `QuadratureError`, `SolverError` (`types::error`)
//!
//! ## Minimal Dependencies
//!
//! No dependency on other workspace crates:
//! - num-traits: Generic floating-point bounds for the solver
//! - thiserror: Structured error enums
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use density_core::analytical::BlackScholes;
//! use density_core::math::interpolators::SmoothingSpline;
//! use density_core::math::quadrature::AdaptiveGaussKronrod;
//!
//! // Call prices on a strike grid
//! let bs = BlackScholes::new(100.0, 0.01, 0.2).unwrap();
//! let strikes: Vec<f64> = (60..=140).map(f64::from).collect();
//! let calls: Vec<f64> = strikes.iter().map(|&k| bs.price_call(k, 0.5)).collect();
//!
//! // Interpolate, differentiate twice, integrate
//! let fit = SmoothingSpline::new(3, 0.0).unwrap().fit(&strikes, &calls).unwrap();
//! let second = fit.spline().derivative(2);
//! let mass = AdaptiveGaussKronrod::with_defaults()
//!     .integrate(|k| second.evaluate(k).unwrap_or(0.0), 60.0, 140.0)
//!     .unwrap();
//! # assert!((mass.value * (0.005_f64).exp() - 0.992).abs() < 0.005);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for error, config and spline types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod math;
pub mod types;
