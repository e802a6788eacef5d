//! Solver configuration types.

use num_traits::Float;

/// Configuration for bracketing root finders.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for tolerances (e.g., `f64`)
///
/// # Example
///
/// ```
/// use density_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.x_tolerance < 1e-8);
/// assert_eq!(config.max_iterations, 100);
///
/// let custom = SolverConfig::new(1e-6, 1e-3, 60);
/// assert_eq!(custom.max_iterations, 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Width below which the bracket is considered collapsed.
    pub x_tolerance: T,

    /// The solver stops as soon as `|f(x)| <= f_tolerance`.
    pub f_tolerance: T,

    /// Maximum number of iterations before giving up.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values: `x_tolerance = 1e-10`, `f_tolerance = 1e-10`,
    /// `max_iterations = 100`.
    fn default() -> Self {
        Self {
            x_tolerance: T::from(1e-10).unwrap(),
            f_tolerance: T::from(1e-10).unwrap(),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration.
    ///
    /// # Panics
    ///
    /// Panics if either tolerance is not positive or `max_iterations == 0`.
    pub fn new(x_tolerance: T, f_tolerance: T, max_iterations: usize) -> Self {
        assert!(x_tolerance > T::zero(), "x_tolerance must be positive");
        assert!(f_tolerance > T::zero(), "f_tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            x_tolerance,
            f_tolerance,
            max_iterations,
        }
    }

    /// Settings used when searching the smoothing weight of a spline fit.
    ///
    /// The target function there is a relative residual mismatch, so a
    /// 1e-3 acceptance band mirrors the classic FITPACK `tol` of 0.001.
    pub fn smoothing_search() -> Self {
        Self {
            x_tolerance: T::from(1e-9).unwrap(),
            f_tolerance: T::from(1e-3).unwrap(),
            max_iterations: 200,
        }
    }
}
