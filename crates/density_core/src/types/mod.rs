//! Core error types.
//!
//! # Re-exports
//!
//! [`InterpolationError`], [`SolverError`] and [`QuadratureError`] are
//! re-exported at this module level.

pub mod error;

pub use error::{InterpolationError, QuadratureError, SolverError};
