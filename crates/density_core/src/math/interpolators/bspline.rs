//! B-spline curves in knot/coefficient form.
//!
//! A [`BSpline`] of degree `p` with `n` coefficients carries `n + p + 1`
//! non-decreasing knots and is defined on `[t[p], t[n]]`. Evaluation uses the
//! Cox–de Boor recurrence; derivatives are taken by differencing the
//! coefficients, which yields another `BSpline` of degree `p - 1`.

use super::Interpolator;
use crate::math::linalg::solve_lu;
use crate::types::InterpolationError;

/// Highest supported spline degree.
pub const MAX_DEGREE: usize = 5;

/// Immutable B-spline curve.
///
/// # Example
///
/// ```
/// use density_core::math::interpolators::{BSpline, Interpolator};
///
/// let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
///
/// let spline = BSpline::interpolating(&xs, &ys, 3).unwrap();
/// assert!((spline.interpolate(2.5).unwrap() - 6.25).abs() < 1e-12);
/// assert!((spline.evaluate_derivative(1.5, 2).unwrap() - 2.0).abs() < 1e-10);
/// assert!(spline.interpolate(4.5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSpline {
    knots: Vec<f64>,
    coeffs: Vec<f64>,
    degree: usize,
}

impl BSpline {
    /// Construct a spline from knots, coefficients and degree.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - knot count is not `coeffs.len() + degree + 1`, knots
    ///   decrease, or any value is non-finite
    /// * `InsufficientData` - fewer than `degree + 1` coefficients
    pub fn new(
        knots: Vec<f64>,
        coeffs: Vec<f64>,
        degree: usize,
    ) -> Result<Self, InterpolationError> {
        if coeffs.len() < degree + 1 {
            return Err(InterpolationError::InsufficientData {
                got: coeffs.len(),
                need: degree + 1,
            });
        }
        if knots.len() != coeffs.len() + degree + 1 {
            return Err(InterpolationError::InvalidInput(format!(
                "expected {} knots for {} coefficients of degree {}, got {}",
                coeffs.len() + degree + 1,
                coeffs.len(),
                degree,
                knots.len()
            )));
        }
        if knots.iter().any(|t| !t.is_finite()) {
            return Err(InterpolationError::InvalidInput(
                "knots must be finite".to_string(),
            ));
        }
        if let Some(i) = knots.windows(2).position(|w| w[1] < w[0]) {
            return Err(InterpolationError::InvalidInput(format!(
                "knots decrease at index {}",
                i + 1
            )));
        }
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(InterpolationError::NonFiniteCoefficients);
        }
        let spline = Self {
            knots,
            coeffs,
            degree,
        };
        let (lo, hi) = spline.domain();
        if hi <= lo {
            return Err(InterpolationError::InvalidInput(format!(
                "empty spline domain [{}, {}]",
                lo, hi
            )));
        }
        Ok(spline)
    }

    /// Interpolating spline of the given degree through `(xs, ys)`.
    ///
    /// Knots follow the FITPACK interpolation layout, see
    /// [`interpolation_knots`](Self::interpolation_knots). The coefficients
    /// solve the square collocation system exactly.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - degree outside `1..=5`, length mismatch or non-finite data
    /// * `InsufficientData` - fewer than `degree + 1` points
    /// * `NonMonotonicData` - `xs` not strictly increasing
    /// * `SingularSystem` - collocation matrix could not be factorised
    pub fn interpolating(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self, InterpolationError> {
        validate_data(xs, ys, degree)?;
        let knots = Self::interpolation_knots(xs, degree);
        let basis = collocation_matrix(&knots, degree, xs);
        let coeffs = solve_lu(basis, ys.to_vec()).ok_or_else(|| {
            InterpolationError::SingularSystem("collocation matrix is singular".to_string())
        })?;
        Self::new(knots, coeffs, degree)
    }

    /// Knot vector for interpolating `xs` with a spline of degree `k`.
    ///
    /// `k + 1` copies of each end point, then `len - k - 1` interior knots:
    /// data sites for odd `k`, midpoints between data sites for even `k`.
    /// Assumes `xs.len() >= k + 1`.
    pub fn interpolation_knots(xs: &[f64], degree: usize) -> Vec<f64> {
        let m = xs.len();
        let k = degree;
        let mut knots = Vec::with_capacity(m + k + 1);
        knots.extend(std::iter::repeat(xs[0]).take(k + 1));
        if m > k + 1 {
            if k % 2 == 1 {
                let half = (k + 1) / 2;
                knots.extend_from_slice(&xs[half..m - half]);
            } else {
                let half = k / 2;
                knots.extend((half..m - 1 - half).map(|j| 0.5 * (xs[j] + xs[j + 1])));
            }
        }
        knots.extend(std::iter::repeat(xs[m - 1]).take(k + 1));
        knots
    }

    /// Polynomial degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Knot vector.
    #[inline]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// B-spline coefficients.
    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Value at `x`, rejecting points outside the domain.
    pub fn evaluate(&self, x: f64) -> Result<f64, InterpolationError> {
        self.check_domain(x)?;
        Ok(self.eval_unchecked(x))
    }

    /// Value of the `order`-th derivative at `x`.
    pub fn evaluate_derivative(&self, x: f64, order: usize) -> Result<f64, InterpolationError> {
        self.check_domain(x)?;
        if order == 0 {
            return Ok(self.eval_unchecked(x));
        }
        Ok(self.derivative(order).eval_unchecked(x))
    }

    /// The `order`-th derivative as a new spline on the same domain.
    ///
    /// Differentiating past the degree gives the zero spline of degree 0.
    pub fn derivative(&self, order: usize) -> BSpline {
        let mut current = self.clone();
        for _ in 0..order {
            current = current.differentiate_once();
        }
        current
    }

    /// Row of basis function values at `x`: `(first index, values)` where
    /// `values[r]` multiplies coefficient `first + r`.
    pub fn basis_at(&self, x: f64) -> (usize, Vec<f64>) {
        let span = find_span(&self.knots, self.degree, self.coeffs.len(), x);
        (span - self.degree, basis_funs(&self.knots, self.degree, span, x))
    }

    fn differentiate_once(&self) -> BSpline {
        let p = self.degree;
        if p == 0 {
            let (lo, hi) = self.domain();
            return BSpline {
                knots: vec![lo, hi],
                coeffs: vec![0.0],
                degree: 0,
            };
        }
        let n = self.coeffs.len();
        let t = &self.knots;
        let coeffs = (0..n - 1)
            .map(|i| {
                let denom = t[i + p + 1] - t[i + 1];
                if denom > 0.0 {
                    p as f64 * (self.coeffs[i + 1] - self.coeffs[i]) / denom
                } else {
                    0.0
                }
            })
            .collect();
        BSpline {
            knots: t[1..t.len() - 1].to_vec(),
            coeffs,
            degree: p - 1,
        }
    }

    fn eval_unchecked(&self, x: f64) -> f64 {
        let (first, basis) = self.basis_at(x);
        basis
            .iter()
            .zip(&self.coeffs[first..])
            .map(|(b, c)| b * c)
            .sum()
    }

    fn check_domain(&self, x: f64) -> Result<(), InterpolationError> {
        let (min, max) = self.domain();
        if x.is_nan() || x < min || x > max {
            return Err(InterpolationError::OutOfBounds { x, min, max });
        }
        Ok(())
    }
}

impl Interpolator for BSpline {
    fn interpolate(&self, x: f64) -> Result<f64, InterpolationError> {
        self.evaluate(x)
    }

    fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.coeffs.len()])
    }
}

/// Shared validation for fitting routines.
pub(crate) fn validate_data(xs: &[f64], ys: &[f64], degree: usize) -> Result<(), InterpolationError> {
    if !(1..=MAX_DEGREE).contains(&degree) {
        return Err(InterpolationError::InvalidInput(format!(
            "degree must be in 1..={}, got {}",
            MAX_DEGREE, degree
        )));
    }
    if xs.len() != ys.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "xs and ys must have same length: got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < degree + 1 {
        return Err(InterpolationError::InsufficientData {
            got: xs.len(),
            need: degree + 1,
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(InterpolationError::InvalidInput(
            "data must be finite".to_string(),
        ));
    }
    if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(InterpolationError::NonMonotonicData { index: i + 1 });
    }
    Ok(())
}

/// Dense collocation matrix `B[i][j] = N_j(x_i)`.
pub(crate) fn collocation_matrix(knots: &[f64], degree: usize, xs: &[f64]) -> Vec<Vec<f64>> {
    let n = knots.len() - degree - 1;
    xs.iter()
        .map(|&x| {
            let span = find_span(knots, degree, n, x);
            let mut row = vec![0.0; n];
            for (r, v) in basis_funs(knots, degree, span, x).into_iter().enumerate() {
                row[span - degree + r] = v;
            }
            row
        })
        .collect()
}

/// Jumps of the `degree`-th derivative across each interior knot, as a
/// matrix acting on coefficient vectors (`interior knots × coefficients`).
pub(crate) fn derivative_jump_matrix(knots: &[f64], degree: usize) -> Vec<Vec<f64>> {
    let n = knots.len() - degree - 1;
    let interior = n.saturating_sub(degree + 1);
    let mut jumps = vec![vec![0.0; n]; interior];
    for c in 0..n {
        let mut unit = vec![0.0; n];
        unit[c] = 1.0;
        let piecewise_constant = BSpline {
            knots: knots.to_vec(),
            coeffs: unit,
            degree,
        }
        .derivative(degree);
        let d = piecewise_constant.coefficients();
        for (j, row) in jumps.iter_mut().enumerate() {
            row[c] = d[j + 1] - d[j];
        }
    }
    jumps
}

/// Knot span index `i` with `t[i] <= x < t[i+1]`, clamped to `degree..n`.
fn find_span(knots: &[f64], degree: usize, n: usize, x: f64) -> usize {
    let upper = knots.partition_point(|&t| t <= x);
    upper.saturating_sub(1).clamp(degree, n - 1)
}

/// Non-zero basis functions `N_{span-p..=span, p}(x)` (Cox–de Boor).
fn basis_funs(knots: &[f64], degree: usize, span: usize, x: f64) -> Vec<f64> {
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    values[0] = 1.0;
    for j in 1..=degree {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom != 0.0 { values[r] / denom } else { 0.0 };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_new_validates_knot_count() {
        let result = BSpline::new(vec![0.0, 0.0, 1.0, 1.0], vec![1.0, 2.0, 3.0], 1);
        assert!(matches!(result, Err(InterpolationError::InvalidInput(_))));
    }

    #[test]
    fn test_new_rejects_decreasing_knots() {
        let result = BSpline::new(vec![0.0, 0.0, 2.0, 1.0, 3.0, 3.0], vec![1.0, 2.0, 3.0, 4.0], 1);
        assert!(matches!(result, Err(InterpolationError::InvalidInput(_))));
    }

    #[test]
    fn test_new_rejects_non_finite_coefficients() {
        let result = BSpline::new(vec![0.0, 0.0, 1.0, 1.0], vec![1.0, f64::INFINITY], 1);
        assert_eq!(result, Err(InterpolationError::NonFiniteCoefficients));
    }

    #[test]
    fn test_interpolation_knots_odd_degree() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let knots = BSpline::interpolation_knots(&xs, 3);
        assert_eq!(
            knots,
            vec![0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 5.0, 5.0, 5.0, 5.0]
        );
    }

    #[test]
    fn test_interpolation_knots_even_degree() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let knots = BSpline::interpolation_knots(&xs, 2);
        assert_eq!(knots, vec![0.0, 0.0, 0.0, 1.5, 2.5, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_interpolating_rejects_bad_data() {
        assert!(matches!(
            BSpline::interpolating(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], 3),
            Err(InterpolationError::InsufficientData { got: 3, need: 4 })
        ));
        assert!(matches!(
            BSpline::interpolating(&[0.0, 2.0, 1.0, 3.0], &[0.0; 4], 1),
            Err(InterpolationError::NonMonotonicData { index: 2 })
        ));
        assert!(matches!(
            BSpline::interpolating(&[0.0, 1.0], &[0.0, 1.0], 6),
            Err(InterpolationError::InvalidInput(_))
        ));
    }

    // ========================================
    // Evaluation Tests
    // ========================================

    #[test]
    fn test_basis_partition_of_unity() {
        let xs = grid(9, -1.0, 3.0);
        let ys = vec![0.0; 9];
        for degree in 1..=5 {
            let spline = BSpline::interpolating(&xs, &ys, degree).unwrap();
            for &x in &[-1.0, -0.3, 0.5, 1.25, 2.999, 3.0] {
                let (_, basis) = spline.basis_at(x);
                assert_abs_diff_eq!(basis.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_interpolates_data_exactly() {
        let xs = grid(12, 0.0, 6.0);
        let ys: Vec<f64> = xs.iter().map(|x| (x * 0.7).sin()).collect();
        for degree in 1..=5 {
            let spline = BSpline::interpolating(&xs, &ys, degree).unwrap();
            for (x, y) in xs.iter().zip(&ys) {
                assert_abs_diff_eq!(spline.evaluate(*x).unwrap(), *y, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_reproduces_polynomial_of_its_degree() {
        let xs = grid(10, 1.0, 4.0);
        let ys: Vec<f64> = xs.iter().map(|x| x * x * x - 2.0 * x).collect();
        let spline = BSpline::interpolating(&xs, &ys, 3).unwrap();
        for &x in &[1.1, 2.2, 3.7] {
            assert_abs_diff_eq!(spline.evaluate(x).unwrap(), x * x * x - 2.0 * x, epsilon = 1e-10);
            assert_abs_diff_eq!(
                spline.evaluate_derivative(x, 1).unwrap(),
                3.0 * x * x - 2.0,
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(spline.evaluate_derivative(x, 2).unwrap(), 6.0 * x, epsilon = 1e-8);
            assert_abs_diff_eq!(spline.evaluate_derivative(x, 3).unwrap(), 6.0, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_derivative_beyond_degree_is_zero() {
        let xs = grid(6, 0.0, 1.0);
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        let spline = BSpline::interpolating(&xs, &ys, 2).unwrap();
        assert_eq!(spline.evaluate_derivative(0.5, 3).unwrap(), 0.0);
        assert_eq!(spline.derivative(4).domain(), (0.0, 1.0));
    }

    #[test]
    fn test_out_of_domain_rejected() {
        let spline = BSpline::interpolating(&[0.0, 1.0, 2.0], &[1.0, 2.0, 0.0], 2).unwrap();
        assert!(matches!(
            spline.evaluate(-0.1),
            Err(InterpolationError::OutOfBounds { min, max, .. }) if min == 0.0 && max == 2.0
        ));
        assert!(spline.evaluate_derivative(2.1, 2).is_err());
        assert!(spline.evaluate(f64::NAN).is_err());
        assert!(spline.evaluate(2.0).is_ok());
    }

    #[test]
    fn test_linear_spline_is_piecewise_linear() {
        let spline = BSpline::interpolating(&[0.0, 1.0, 3.0], &[0.0, 2.0, 0.0], 1).unwrap();
        assert_abs_diff_eq!(spline.evaluate(0.5).unwrap(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(spline.evaluate(2.0).unwrap(), 1.0, epsilon = 1e-14);
        assert!(spline.contains(3.0));
        assert!(!spline.contains(3.5));
    }

    #[test]
    fn test_jump_matrix_annihilates_polynomials() {
        let xs = grid(8, 0.0, 7.0);
        let knots = BSpline::interpolation_knots(&xs, 3);
        let jumps = derivative_jump_matrix(&knots, 3);
        assert_eq!(jumps.len(), 4);

        let poly: Vec<f64> = xs.iter().map(|x| 2.0 * x * x * x - x + 1.0).collect();
        let spline = BSpline::interpolating(&xs, &poly, 3).unwrap();
        for row in &jumps {
            let jump: f64 = row.iter().zip(spline.coefficients()).map(|(j, c)| j * c).sum();
            assert_abs_diff_eq!(jump, 0.0, epsilon = 1e-8);
        }

        let wiggly: Vec<f64> = xs.iter().map(|x| (x * 1.3).cos()).collect();
        let spline = BSpline::interpolating(&xs, &wiggly, 3).unwrap();
        let total: f64 = jumps
            .iter()
            .map(|row| {
                row.iter()
                    .zip(spline.coefficients())
                    .map(|(j, c)| j * c)
                    .sum::<f64>()
                    .abs()
            })
            .sum();
        assert!(total > 1e-3);
    }
}
