//! Error types for structured error handling.
//!
//! This module provides:
//! - `InterpolationError`: Errors from spline construction and evaluation
//! - `SolverError`: Errors from root-finding solvers
//! - `QuadratureError`: Errors from adaptive numerical integration

use thiserror::Error;

/// Spline construction and evaluation errors.
///
/// # Variants
/// - `OutOfBounds`: Query point outside the fitted domain
/// - `InsufficientData`: Not enough points for the requested degree
/// - `NonMonotonicData`: Abscissae are not strictly increasing
/// - `InvalidInput`: General invalid input error
/// - `SingularSystem`: The fitting system could not be solved
/// - `SmoothingSearchFailed`: No smoothing weight reproduced the target residual
/// - `NonFiniteCoefficients`: The solve produced NaN or infinite coefficients
///
/// # Examples
/// ```
/// use density_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for the requested spline degree.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Abscissae are not strictly increasing.
    #[error("Data is not strictly increasing at index {index}")]
    NonMonotonicData {
        /// Index where the violation was detected
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Linear system for the spline coefficients is singular or indefinite.
    #[error("Singular fitting system: {0}")]
    SingularSystem(String),

    /// The smoothing weight search did not reach the requested residual.
    #[error("Smoothing weight search failed: {0}")]
    SmoothingSearchFailed(String),

    /// Fitted coefficients contain NaN or infinite values.
    #[error("Fitted spline has non-finite coefficients")]
    NonFiniteCoefficients,
}

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: General numerical instability
///
/// # Examples
/// ```
/// use density_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl From<SolverError> for InterpolationError {
    fn from(err: SolverError) -> Self {
        InterpolationError::SmoothingSearchFailed(err.to_string())
    }
}

/// Adaptive quadrature errors.
///
/// # Examples
/// ```
/// use density_core::types::QuadratureError;
///
/// let err = QuadratureError::SubdivisionLimit { limit: 2000, abs_error: 1e-3 };
/// assert!(format!("{}", err).contains("2000"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuadratureError {
    /// Error estimate still above tolerance when the subdivision budget ran out.
    #[error("Subdivision limit of {limit} reached with estimated error {abs_error:e}")]
    SubdivisionLimit {
        /// Maximum number of subintervals allowed
        limit: usize,
        /// Error estimate at termination
        abs_error: f64,
    },

    /// Integrand or accumulated result is not finite.
    #[error("Non-finite value encountered on [{a}, {b}]")]
    NonFinite {
        /// Left end of the offending interval
        a: f64,
        /// Right end of the offending interval
        b: f64,
    },

    /// An interval became too narrow to bisect in floating point.
    #[error("Interval [{a}, {b}] cannot be subdivided further")]
    Roundoff {
        /// Left end of the interval
        a: f64,
        /// Right end of the interval
        b: f64,
    },

    /// Invalid integration bounds or configuration.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
