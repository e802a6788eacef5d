//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection, secant and inverse quadratic interpolation. Needs a
/// bracket `[a, b]` with `f(a)` and `f(b)` of opposite sign and never leaves
/// it, so it is safe for monotone but badly scaled targets such as the
/// residual curve of a smoothing spline.
///
/// # Example
///
/// ```
/// use density_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - `|f(x)| <= f_tolerance`, or the bracket collapsed around `x`
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have the same sign
    /// * `Err(SolverError::NumericalInstability)` - `f` returned a non-finite value
    /// * `Err(SolverError::MaxIterationsExceeded)` - iteration budget exhausted
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        let half = T::from(0.5).unwrap();

        let eval = |x: T| -> Result<T, SolverError> {
            let y = f(x);
            if y.is_finite() {
                Ok(y)
            } else {
                Err(SolverError::NumericalInstability(format!(
                    "non-finite objective at x = {}",
                    x.to_f64().unwrap_or(f64::NAN)
                )))
            }
        };

        let (mut a, mut b) = (a, b);
        let (mut fa, mut fb) = (eval(a)?, eval(b)?);

        if fa.abs() <= self.config.f_tolerance {
            return Ok(a);
        }
        if fb.abs() <= self.config.f_tolerance {
            return Ok(b);
        }
        if fa.signum() == fb.signum() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        // c is the contrapoint: f(b) and f(c) always straddle zero.
        let (mut c, mut fc) = (a, fa);
        let mut step = b - a;
        let mut prev_step = step;

        for _ in 0..self.config.max_iterations {
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = two * T::epsilon() * b.abs() + half * self.config.x_tolerance;
            let mid = half * (c - b);

            if fb.abs() <= self.config.f_tolerance || mid.abs() <= tol {
                return Ok(b);
            }

            let interpolate = prev_step.abs() >= tol && fa.abs() > fb.abs();
            if interpolate {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    // Secant step
                    (two * mid * s, T::one() - s)
                } else {
                    // Inverse quadratic interpolation
                    let q0 = fa / fc;
                    let r = fb / fc;
                    (
                        s * (two * mid * q0 * (q0 - r) - (b - a) * (r - T::one())),
                        (q0 - T::one()) * (r - T::one()) * (s - T::one()),
                    )
                };
                if p > T::zero() {
                    q = -q;
                } else {
                    p = -p;
                }

                let accept = two * p < three * mid * q - (tol * q).abs()
                    && p < (half * prev_step * q).abs();
                if accept {
                    prev_step = step;
                    step = p / q;
                } else {
                    step = mid;
                    prev_step = mid;
                }
            } else {
                step = mid;
                prev_step = mid;
            }

            a = b;
            fa = fb;
            b = if step.abs() > tol {
                b + step
            } else if mid > T::zero() {
                b + tol
            } else {
                b - tol
            };
            fb = eval(b)?;

            if fb.signum() == fc.signum() {
                c = a;
                fc = fa;
                step = b - a;
                prev_step = step;
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}
