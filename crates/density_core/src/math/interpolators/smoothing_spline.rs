//! Penalised smoothing splines with a residual target.
//!
//! Given data `(x_i, y_i)`, degree `k` and smoothing factor `s ≥ 0`, find the
//! spline `S` on the interpolation knots that minimises the sum of squared
//! jumps of `S⁽ᵏ⁾` across interior knots subject to
//!
//! ```text
//! F = Σ (y_i − S(x_i))² = s
//! ```
//!
//! For a weight `p` the penalised problem
//! `(BᵀB + Q / p) c = Bᵀy` has a residual `F(p)` that decreases from the
//! least-squares polynomial residual `fp0` (`p → 0`) to zero (`p → ∞`).
//! The weight is located with Brent's method on `log10 p`. When `s ≥ fp0`
//! the degree-`k` least-squares polynomial is the answer.

use super::bspline::{
    collocation_matrix, derivative_jump_matrix, validate_data, BSpline, MAX_DEGREE,
};
use crate::math::linalg::{gram, solve_cholesky, solve_lu, transpose_mul};
use crate::math::solvers::{BrentSolver, SolverConfig};
use crate::types::InterpolationError;

/// Search interval for `log10 p`.
const LOG10_WEIGHT_RANGE: (f64, f64) = (-8.0, 10.0);

/// Smoothing spline fitter.
///
/// # Example
///
/// ```
/// use density_core::math::interpolators::{Interpolator, SmoothingSpline};
///
/// let xs: Vec<f64> = (0..20).map(|i| i as f64 * 0.25).collect();
/// let ys: Vec<f64> = xs
///     .iter()
///     .enumerate()
///     .map(|(i, x)| x.sin() + if i % 2 == 0 { 0.01 } else { -0.01 })
///     .collect();
///
/// let fit = SmoothingSpline::new(3, 20.0 * 1e-4).unwrap().fit(&xs, &ys).unwrap();
/// assert!((fit.residual() - 2e-3).abs() < 2e-5);
/// assert!(fit.spline().interpolate(1.0).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SmoothingSpline {
    degree: usize,
    smoothing_factor: f64,
    search: SolverConfig<f64>,
}

/// Result of a smoothing spline fit.
#[derive(Debug, Clone)]
pub struct SmoothingFit {
    spline: BSpline,
    residual: f64,
    log10_weight: Option<f64>,
}

impl SmoothingFit {
    /// The fitted spline.
    pub fn spline(&self) -> &BSpline {
        &self.spline
    }

    /// Consume the fit and return the spline.
    pub fn into_spline(self) -> BSpline {
        self.spline
    }

    /// Sum of squared residuals at the data sites.
    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// `log10 p` of the selected weight, `None` for exact interpolation or
    /// the polynomial fallback.
    pub fn log10_weight(&self) -> Option<f64> {
        self.log10_weight
    }
}

impl SmoothingSpline {
    /// Create a fitter for degree `k` (`1..=5`) and smoothing factor `s ≥ 0`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the degree or smoothing factor is out of range.
    pub fn new(degree: usize, smoothing_factor: f64) -> Result<Self, InterpolationError> {
        if !(1..=MAX_DEGREE).contains(&degree) {
            return Err(InterpolationError::InvalidInput(format!(
                "degree must be in 1..={}, got {}",
                MAX_DEGREE, degree
            )));
        }
        if !smoothing_factor.is_finite() || smoothing_factor < 0.0 {
            return Err(InterpolationError::InvalidInput(format!(
                "smoothing factor must be finite and non-negative, got {}",
                smoothing_factor
            )));
        }
        Ok(Self {
            degree,
            smoothing_factor,
            search: SolverConfig::smoothing_search(),
        })
    }

    /// Override the tolerances of the weight search.
    pub fn with_search_config(mut self, search: SolverConfig<f64>) -> Self {
        self.search = search;
        self
    }

    /// Polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Target residual `s`.
    pub fn smoothing_factor(&self) -> f64 {
        self.smoothing_factor
    }

    /// Fit the spline to strictly increasing `xs` and finite `ys`.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - fewer than `degree + 1` points
    /// * `NonMonotonicData` - repeated or decreasing abscissae
    /// * `SingularSystem` - a linear solve failed
    /// * `SmoothingSearchFailed` - Brent's method did not converge
    /// * `NonFiniteCoefficients` - the solution overflowed
    pub fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<SmoothingFit, InterpolationError> {
        validate_data(xs, ys, self.degree)?;
        let k = self.degree;
        let knots = BSpline::interpolation_knots(xs, k);
        let basis = collocation_matrix(&knots, k, xs);

        if self.smoothing_factor == 0.0 {
            let coeffs = solve_lu(basis, ys.to_vec()).ok_or_else(|| {
                InterpolationError::SingularSystem("collocation matrix is singular".to_string())
            })?;
            let spline = BSpline::new(knots, coeffs, k)?;
            return Ok(SmoothingFit {
                residual: residual_of(&spline, xs, ys),
                spline,
                log10_weight: None,
            });
        }

        let poly_values = least_squares_polynomial(xs, ys, k)?;
        let fp0 = sum_sq_diff(ys, &poly_values);
        if self.smoothing_factor >= fp0 {
            let coeffs = solve_lu(basis, poly_values).ok_or_else(|| {
                InterpolationError::SingularSystem("collocation matrix is singular".to_string())
            })?;
            return Ok(SmoothingFit {
                spline: BSpline::new(knots, coeffs, k)?,
                residual: fp0,
                log10_weight: None,
            });
        }

        let problem = PenalisedProblem::new(&knots, k, &basis, ys);
        let s = self.smoothing_factor;
        let (lo, hi) = LOG10_WEIGHT_RANGE;

        let (lo_coeffs, lo_residual) = problem.solve(lo)?;
        if lo_residual <= s {
            return finish(knots, lo_coeffs, k, lo_residual, lo);
        }
        let (hi_coeffs, hi_residual) = problem.solve(hi)?;
        if hi_residual >= s {
            return finish(knots, hi_coeffs, k, hi_residual, hi);
        }

        let solver = BrentSolver::new(self.search);
        let root = solver.find_root(
            |log10_p| match problem.solve(log10_p) {
                Ok((_, residual)) => (residual - s) / s,
                Err(_) => f64::NAN,
            },
            lo,
            hi,
        )?;
        let (coeffs, residual) = problem.solve(root)?;
        finish(knots, coeffs, k, residual, root)
    }
}

fn finish(
    knots: Vec<f64>,
    coeffs: Vec<f64>,
    degree: usize,
    residual: f64,
    log10_weight: f64,
) -> Result<SmoothingFit, InterpolationError> {
    Ok(SmoothingFit {
        spline: BSpline::new(knots, coeffs, degree)?,
        residual,
        log10_weight: Some(log10_weight),
    })
}

/// Normal equations of the penalised least-squares problem.
struct PenalisedProblem<'a> {
    basis: &'a [Vec<f64>],
    ys: &'a [f64],
    normal: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    penalty: Vec<Vec<f64>>,
}

impl<'a> PenalisedProblem<'a> {
    fn new(knots: &[f64], degree: usize, basis: &'a [Vec<f64>], ys: &'a [f64]) -> Self {
        let n = ys.len();
        let normal = gram(basis, n);
        let rhs = transpose_mul(basis, ys, n);
        let mut penalty = gram(&derivative_jump_matrix(knots, degree), n);

        // Scale Q to the magnitude of BᵀB.
        let trace_normal: f64 = (0..n).map(|i| normal[i][i]).sum();
        let trace_penalty: f64 = (0..n).map(|i| penalty[i][i]).sum();
        if trace_penalty > 0.0 {
            let scale = trace_normal / trace_penalty;
            for row in penalty.iter_mut() {
                for v in row.iter_mut() {
                    *v *= scale;
                }
            }
        }

        Self {
            basis,
            ys,
            normal,
            rhs,
            penalty,
        }
    }

    /// Coefficients and residual for weight `p = 10^log10_p`.
    fn solve(&self, log10_p: f64) -> Result<(Vec<f64>, f64), InterpolationError> {
        let inv_p = 10f64.powf(-log10_p);
        let system: Vec<Vec<f64>> = self
            .normal
            .iter()
            .zip(&self.penalty)
            .map(|(a, q)| a.iter().zip(q).map(|(a, q)| a + inv_p * q).collect())
            .collect();
        let coeffs = solve_cholesky(&system, &self.rhs).ok_or_else(|| {
            InterpolationError::SingularSystem(format!(
                "penalised system not positive definite at log10 p = {}",
                log10_p
            ))
        })?;
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(InterpolationError::NonFiniteCoefficients);
        }
        let fitted: Vec<f64> = self
            .basis
            .iter()
            .map(|row| row.iter().zip(&coeffs).map(|(b, c)| b * c).sum())
            .collect();
        let residual = sum_sq_diff(self.ys, &fitted);
        Ok((coeffs, residual))
    }
}

/// Values at `xs` of the degree-`k` least-squares polynomial.
fn least_squares_polynomial(
    xs: &[f64],
    ys: &[f64],
    degree: usize,
) -> Result<Vec<f64>, InterpolationError> {
    let first = xs[0];
    let last = xs[xs.len() - 1];
    let centre = 0.5 * (first + last);
    let half_width = 0.5 * (last - first);

    // Monomials in u ∈ [-1, 1] keep the normal equations well conditioned.
    let vandermonde: Vec<Vec<f64>> = xs
        .iter()
        .map(|&x| {
            let u = (x - centre) / half_width;
            let mut powers = Vec::with_capacity(degree + 1);
            let mut v = 1.0;
            for _ in 0..=degree {
                powers.push(v);
                v *= u;
            }
            powers
        })
        .collect();
    let normal = gram(&vandermonde, degree + 1);
    let rhs = transpose_mul(&vandermonde, ys, degree + 1);
    let poly = solve_cholesky(&normal, &rhs).ok_or_else(|| {
        InterpolationError::SingularSystem("polynomial normal equations are singular".to_string())
    })?;
    Ok(vandermonde
        .iter()
        .map(|row| row.iter().zip(&poly).map(|(v, a)| v * a).sum())
        .collect())
}

fn residual_of(spline: &BSpline, xs: &[f64], ys: &[f64]) -> f64 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let (first, basis) = spline.basis_at(x);
            let fitted: f64 = basis
                .iter()
                .zip(&spline.coefficients()[first..])
                .map(|(b, c)| b * c)
                .sum();
            (y - fitted).powi(2)
        })
        .sum()
}

fn sum_sq_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
