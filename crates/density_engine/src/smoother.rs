//! Spline fit of a price curve.

use density_core::math::interpolators::{BSpline, Interpolator, SmoothingSpline};
use tracing::debug;

use crate::curve::StrikeCurve;
use crate::error::DensityError;

/// Spline degree and smoothing factor.
///
/// `smoothing_factor = 0` interpolates the prices exactly; larger values
/// allow a total squared residual of up to `smoothing_factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothingParams {
    /// Target residual sum of squares `s >= 0`
    pub smoothing_factor: f64,
    /// Spline degree `k` in `1..=5`
    pub degree: usize,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.0,
            degree: 3,
        }
    }
}

/// Fitted price curve over `[min strike, max strike]`.
///
/// Immutable; evaluation outside the strike range fails with
/// `InterpolationError::OutOfBounds` wrapped in [`DensityError::Fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothCurve {
    spline: BSpline,
    residual: f64,
}

impl SmoothCurve {
    /// Fit a spline to the curve.
    ///
    /// # Errors
    ///
    /// [`DensityError::Fit`] when the parameters are out of range, the curve
    /// has fewer than `degree + 1` points, a linear solve fails, the weight
    /// search does not converge, or the coefficients are not finite.
    pub fn fit(curve: &StrikeCurve, params: SmoothingParams) -> Result<Self, DensityError> {
        let fitter = SmoothingSpline::new(params.degree, params.smoothing_factor)?;
        let fit = fitter.fit(curve.strikes(), curve.prices())?;
        debug!(
            points = curve.len(),
            degree = params.degree,
            smoothing_factor = params.smoothing_factor,
            residual = fit.residual(),
            log10_weight = ?fit.log10_weight(),
            "fitted price curve"
        );
        let residual = fit.residual();
        Ok(Self {
            spline: fit.into_spline(),
            residual,
        })
    }

    /// Fitted value at `strike`.
    pub fn evaluate(&self, strike: f64) -> Result<f64, DensityError> {
        Ok(self.spline.evaluate(strike)?)
    }

    /// `order`-th derivative at `strike`.
    pub fn evaluate_derivative(&self, strike: f64, order: usize) -> Result<f64, DensityError> {
        Ok(self.spline.evaluate_derivative(strike, order)?)
    }

    /// `(min strike, max strike)`.
    pub fn domain(&self) -> (f64, f64) {
        self.spline.domain()
    }

    /// Spline degree.
    pub fn degree(&self) -> usize {
        self.spline.degree()
    }

    /// Residual sum of squares at the data points.
    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// Underlying spline.
    pub fn spline(&self) -> &BSpline {
        &self.spline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::StrikeCurveBuilder;
    use crate::error::DensityErrorKind;
    use approx::assert_relative_eq;

    fn scenario_curve() -> StrikeCurve {
        StrikeCurveBuilder::new(3)
            .build(&[12.0, 8.0, 5.0, 2.5, 1.0], &[90.0, 95.0, 100.0, 105.0, 110.0])
            .unwrap()
    }

    #[test]
    fn test_interpolation_reproduces_prices() {
        let curve = scenario_curve();
        let smooth = SmoothCurve::fit(&curve, SmoothingParams::default()).unwrap();
        for quote in curve.quotes() {
            assert_relative_eq!(smooth.evaluate(quote.strike).unwrap(), quote.price, epsilon = 1e-10);
        }
        assert_eq!(smooth.degree(), 3);
        assert_eq!(smooth.domain(), (90.0, 110.0));
        assert!(smooth.residual() < 1e-18);
    }

    #[test]
    fn test_second_derivative_is_convex_for_scenario() {
        let smooth = SmoothCurve::fit(&scenario_curve(), SmoothingParams::default()).unwrap();
        // Interior curvature of a decreasing convex price curve.
        let c2 = smooth.evaluate_derivative(100.0, 2).unwrap();
        assert!(c2 > 0.0, "expected convexity at the money, got {}", c2);
    }

    #[test]
    fn test_out_of_domain_rejected() {
        let smooth = SmoothCurve::fit(&scenario_curve(), SmoothingParams::default()).unwrap();
        let err = smooth.evaluate(80.0).unwrap_err();
        assert_eq!(err.kind(), DensityErrorKind::Fit);
        assert!(smooth.evaluate_derivative(111.0, 1).is_err());
    }

    #[test]
    fn test_invalid_params_are_fit_errors() {
        let curve = scenario_curve();
        for params in [
            SmoothingParams {
                smoothing_factor: -1.0,
                degree: 3,
            },
            SmoothingParams {
                smoothing_factor: 0.0,
                degree: 0,
            },
            SmoothingParams {
                smoothing_factor: 0.0,
                degree: 6,
            },
        ] {
            assert_eq!(
                SmoothCurve::fit(&curve, params).unwrap_err().kind(),
                DensityErrorKind::Fit
            );
        }
    }

    #[test]
    fn test_degree_above_points_is_fit_error() {
        let params = SmoothingParams {
            smoothing_factor: 0.0,
            degree: 5,
        };
        let err = SmoothCurve::fit(&scenario_curve(), params).unwrap_err();
        assert_eq!(err.kind(), DensityErrorKind::Fit);
    }

    #[test]
    fn test_smoothing_respects_residual_target() {
        let strikes: Vec<f64> = (0..25).map(|i| 80.0 + 2.0 * i as f64).collect();
        let prices: Vec<f64> = strikes
            .iter()
            .enumerate()
            .map(|(i, k)| {
                let bump = if i % 2 == 0 { 0.05 } else { -0.05 };
                (30.0 * (-(k - 80.0) / 20.0).exp() + bump).max(0.0)
            })
            .collect();
        let curve = StrikeCurveBuilder::new(3).build(&prices, &strikes).unwrap();
        let target = 25.0 * 0.05 * 0.05;
        let smooth = SmoothCurve::fit(
            &curve,
            SmoothingParams {
                smoothing_factor: target,
                degree: 3,
            },
        )
        .unwrap();
        assert_relative_eq!(smooth.residual(), target, max_relative = 0.05);
        assert_eq!(smooth.spline().degree(), 3);
    }
}
