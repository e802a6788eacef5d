//! Numerical building blocks.
//!
//! - `interpolators`: B-splines and penalised smoothing splines
//! - `quadrature`: adaptive Gauss–Kronrod and trapezoidal integration
//! - `solvers`: Brent root finder
//! - `linalg`: dense LU and Cholesky solves

pub mod interpolators;
pub mod linalg;
pub mod quadrature;
pub mod solvers;
