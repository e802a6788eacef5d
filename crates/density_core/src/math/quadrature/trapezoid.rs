//! Composite trapezoidal rule on sampled data.

/// Trapezoidal integral of samples `ys` taken at abscissae `xs`.
///
/// Pairs beyond the shorter slice are ignored; fewer than two samples
/// integrate to zero.
///
/// # Example
///
/// ```
/// use density_core::math::quadrature::trapezoid;
///
/// let xs = [0.0, 1.0, 3.0];
/// let ys = [0.0, 2.0, 2.0];
/// assert_eq!(trapezoid(&xs, &ys), 5.0);
/// ```
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (y[0] + y[1]) * (x[1] - x[0]))
        .sum()
}
