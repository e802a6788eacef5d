//! Interpolator trait definition.

use crate::types::InterpolationError;

/// Common interface for one-dimensional interpolants.
///
/// Implementations reject queries outside [`domain`](Interpolator::domain)
/// with [`InterpolationError::OutOfBounds`]; no interpolant in this crate
/// extrapolates.
pub trait Interpolator {
    /// Evaluate the interpolant at `x`.
    fn interpolate(&self, x: f64) -> Result<f64, InterpolationError>;

    /// Closed interval `(min, max)` on which the interpolant is defined.
    fn domain(&self) -> (f64, f64);

    /// Returns `true` if `x` lies inside the domain.
    fn contains(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }
}
