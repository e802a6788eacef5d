//! Root-finding solvers.
//!
//! - [`BrentSolver`]: bracketing root finder without derivative requirement,
//!   used to locate the smoothing weight of a penalised spline fit
//! - [`SolverConfig`]: tolerances and iteration budget
//!
//! ```
//! use density_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x.exp() - 2.0, 0.0, 1.0).unwrap();
//! assert!((root - 2.0_f64.ln()).abs() < 1e-9);
//! ```

mod brent;
mod config;

pub use brent::BrentSolver;
pub use config::SolverConfig;
