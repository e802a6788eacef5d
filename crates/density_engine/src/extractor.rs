//! Breeden–Litzenberger density extraction.
//!
//! The risk-neutral density of the terminal price is the discounted second
//! strike-derivative of the call price: `f(K) = e^{rτ} ∂²C/∂K²`. The raw
//! ordinates are clamped at zero, normalised to unit trapezoidal mass and
//! interpolated with a cubic spline for integration.

use density_core::math::interpolators::{BSpline, Interpolator};
use density_core::math::quadrature::{trapezoid, AdaptiveGaussKronrod, QuadratureConfig};
use tracing::debug;

use crate::error::DensityError;
use crate::smoother::SmoothCurve;

/// Relative size of the rounding floor on the raw density area, in units of
/// machine epsilon.
const NOISE_FLOOR_ULPS: f64 = 1e4;

/// Normalised density sampled on a strike grid.
///
/// `values` integrate to one under the trapezoidal rule. Evaluation goes
/// through an interpolating spline that is floored at zero and vanishes
/// outside `[min strike, max strike]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    strikes: Vec<f64>,
    values: Vec<f64>,
    interpolant: BSpline,
    raw_area: f64,
}

impl Density {
    /// Build a density from non-negative, unnormalised samples on a strictly
    /// increasing grid.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - length mismatch, unsorted grid, negative or non-finite samples
    /// * `InsufficientData` - fewer than two points
    /// * `DegenerateDensity` - zero-width grid or zero area
    /// * `Fit` - the interpolant could not be built
    pub fn from_samples(strikes: &[f64], samples: &[f64]) -> Result<Self, DensityError> {
        if strikes.len() != samples.len() {
            return Err(DensityError::InvalidInput(format!(
                "strikes and samples differ in length ({} vs {})",
                strikes.len(),
                samples.len()
            )));
        }
        validate_grid(strikes)?;
        if let Some((i, v)) = samples
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(DensityError::InvalidInput(format!(
                "density sample at index {} must be finite and non-negative, got {}",
                i, v
            )));
        }
        Self::normalise(strikes.to_vec(), samples.to_vec(), 0.0)
    }

    fn normalise(strikes: Vec<f64>, raw: Vec<f64>, noise_floor: f64) -> Result<Self, DensityError> {
        let m = strikes.len();
        let width = strikes[m - 1] - strikes[0];
        if width <= 0.0 {
            return Err(DensityError::DegenerateDensity(
                "strike grid has zero width".to_string(),
            ));
        }

        let area = trapezoid(&strikes, &raw);
        if !area.is_finite() {
            return Err(DensityError::DegenerateDensity(format!(
                "density area is not finite ({})",
                area
            )));
        }
        if area <= noise_floor || area <= 0.0 {
            return Err(DensityError::DegenerateDensity(format!(
                "density area {:e} is at or below the noise floor {:e}",
                area, noise_floor
            )));
        }

        let values: Vec<f64> = raw.iter().map(|v| v / area).collect();
        let interpolant = BSpline::interpolating(&strikes, &values, (m - 1).min(3))?;
        Ok(Self {
            strikes,
            values,
            interpolant,
            raw_area: area,
        })
    }

    /// Strike grid.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Normalised density ordinates at the strikes.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(min strike, max strike)`.
    pub fn support(&self) -> (f64, f64) {
        self.interpolant.domain()
    }

    /// Density at `x`: zero outside the support, never negative inside.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.interpolant.evaluate(x) {
            Ok(v) => v.max(0.0),
            Err(_) => 0.0,
        }
    }

    /// Trapezoidal mass of the normalised samples (one up to rounding).
    pub fn sample_mass(&self) -> f64 {
        trapezoid(&self.strikes, &self.values)
    }

    /// Mass of the evaluated density by adaptive quadrature.
    ///
    /// Differs from [`sample_mass`](Self::sample_mass) by the interpolation
    /// error, which shrinks with the grid spacing.
    pub fn mass(&self, config: &QuadratureConfig) -> Result<f64, DensityError> {
        let (a, b) = self.support();
        let result = AdaptiveGaussKronrod::new(*config).integrate_with_breakpoints(
            |x| self.evaluate(x),
            a,
            b,
            &self.strikes,
        )?;
        Ok(result.value)
    }

    /// Spline through the normalised samples.
    pub fn interpolant(&self) -> &BSpline {
        &self.interpolant
    }

    /// Trapezoidal area of the clamped samples before normalisation.
    pub fn raw_area(&self) -> f64 {
        self.raw_area
    }
}

/// Extract the risk-neutral density from a fitted call-price curve.
///
/// The second derivative of `curve` is taken at each strike, scaled by
/// `exp(risk_free_rate * time_to_maturity)`, clamped at zero and normalised.
///
/// # Errors
///
/// * `InvalidInput` - bad grid, strikes outside the curve, non-finite rate or maturity
/// * `DegenerateDensity` - zero-width grid, or an area that is zero, non-finite
///   or indistinguishable from rounding noise in the price curve
/// * `Fit` - the density interpolant could not be built
///
/// # Examples
/// ```
/// use density_engine::{extract_density, SmoothCurve, SmoothingParams, StrikeCurveBuilder};
///
/// let strikes = [90.0, 95.0, 100.0, 105.0, 110.0];
/// let curve = StrikeCurveBuilder::new(3)
///     .build(&[12.0, 8.0, 5.0, 2.5, 1.0], &strikes)
///     .unwrap();
/// let smooth = SmoothCurve::fit(&curve, SmoothingParams::default()).unwrap();
/// let density = extract_density(&smooth, &strikes, 0.01, 10.0 / 252.0).unwrap();
///
/// assert!(density.values().iter().all(|v| *v >= 0.0));
/// assert!((density.sample_mass() - 1.0).abs() < 1e-12);
/// ```
pub fn extract_density(
    curve: &SmoothCurve,
    strikes: &[f64],
    risk_free_rate: f64,
    time_to_maturity: f64,
) -> Result<Density, DensityError> {
    if !risk_free_rate.is_finite() || !time_to_maturity.is_finite() {
        return Err(DensityError::InvalidInput(format!(
            "rate and maturity must be finite (r = {}, tau = {})",
            risk_free_rate, time_to_maturity
        )));
    }
    validate_grid(strikes)?;
    let raw_len = strikes.len();

    let growth = (risk_free_rate * time_to_maturity).exp();
    let second = curve.spline().derivative(2);
    let mut raw = Vec::with_capacity(raw_len);
    let mut price_scale = 0.0_f64;
    for &k in strikes {
        let d2 = second.evaluate(k).map_err(|_| {
            DensityError::InvalidInput(format!("strike {} lies outside the fitted curve", k))
        })?;
        price_scale = price_scale.max(curve.evaluate(k)?.abs());
        raw.push((growth * d2).max(0.0));
    }

    let width = strikes[raw_len - 1] - strikes[0];
    let min_spacing = strikes
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    let noise_floor = if min_spacing > 0.0 && min_spacing.is_finite() {
        NOISE_FLOOR_ULPS * f64::EPSILON * price_scale / (min_spacing * min_spacing) * width
    } else {
        0.0
    };

    let density = Density::normalise(strikes.to_vec(), raw, noise_floor)?;
    debug!(
        points = raw_len,
        raw_area = density.raw_area(),
        noise_floor,
        "extracted density"
    );
    Ok(density)
}

fn validate_grid(strikes: &[f64]) -> Result<(), DensityError> {
    if strikes.len() < 2 {
        return Err(DensityError::InsufficientData {
            got: strikes.len(),
            need: 2,
        });
    }
    if let Some(k) = strikes.iter().find(|k| !k.is_finite()) {
        return Err(DensityError::InvalidInput(format!("strike {} is not finite", k)));
    }
    if let Some(i) = strikes.windows(2).position(|w| w[1] <= w[0]) {
        return Err(DensityError::InvalidInput(format!(
            "strikes must be strictly increasing (index {})",
            i + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::StrikeCurveBuilder;
    use crate::error::DensityErrorKind;
    use crate::smoother::SmoothingParams;
    use approx::assert_relative_eq;
    use density_core::analytical::BlackScholes;

    const STRIKES: [f64; 5] = [90.0, 95.0, 100.0, 105.0, 110.0];
    const PRICES: [f64; 5] = [12.0, 8.0, 5.0, 2.5, 1.0];

    fn fit(prices: &[f64], strikes: &[f64]) -> SmoothCurve {
        let curve = StrikeCurveBuilder::new(3).build(prices, strikes).unwrap();
        SmoothCurve::fit(&curve, SmoothingParams::default()).unwrap()
    }

    // ========================================
    // Normalisation
    // ========================================

    #[test]
    fn test_scenario_density_is_normalised() {
        let smooth = fit(&PRICES, &STRIKES);
        let density = extract_density(&smooth, &STRIKES, 0.01, 10.0 / 252.0).unwrap();
        assert!(density.values().iter().all(|v| *v >= 0.0));
        assert_relative_eq!(density.sample_mass(), 1.0, epsilon = 1e-12);
        let mass = density.mass(&QuadratureConfig::default()).unwrap();
        assert_relative_eq!(mass, 1.0, epsilon = 1e-6);
        assert!(density.raw_area() > 0.0);
        assert_eq!(density.strikes(), &STRIKES);
        assert_eq!(density.support(), (90.0, 110.0));
    }

    #[test]
    fn test_growth_factor_cancels_in_normalisation() {
        let smooth = fit(&PRICES, &STRIKES);
        let flat = extract_density(&smooth, &STRIKES, 0.0, 0.5).unwrap();
        let grown = extract_density(&smooth, &STRIKES, 0.05, 0.5).unwrap();
        for (a, b) in flat.values().iter().zip(grown.values()) {
            assert_relative_eq!(a, b, max_relative = 1e-12);
        }
        assert_relative_eq!(
            grown.raw_area() / flat.raw_area(),
            (0.05_f64 * 0.5).exp(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_evaluate_outside_support_is_zero() {
        let smooth = fit(&PRICES, &STRIKES);
        let density = extract_density(&smooth, &STRIKES, 0.01, 0.1).unwrap();
        assert_eq!(density.evaluate(80.0), 0.0);
        assert_eq!(density.evaluate(120.0), 0.0);
        assert!(density.evaluate(100.0) >= 0.0);
    }

    #[test]
    fn test_fine_grid_quadrature_mass() {
        let model = BlackScholes::new(100.0, 0.01, 0.2).unwrap();
        let strikes: Vec<f64> = (40..=200).map(|k| k as f64).collect();
        let prices: Vec<f64> = strikes.iter().map(|&k| model.price_call(k, 0.5)).collect();
        let smooth = fit(&prices, &strikes);
        let density = extract_density(&smooth, &strikes, 0.01, 0.5).unwrap();
        let mass = density.mass(&QuadratureConfig::default()).unwrap();
        assert_relative_eq!(mass, 1.0, epsilon = 1e-6);
    }

    // ========================================
    // Degenerate Inputs
    // ========================================

    #[test]
    fn test_constant_prices_are_degenerate() {
        let smooth = fit(&[5.0; 5], &STRIKES);
        let err = extract_density(&smooth, &STRIKES, 0.01, 0.1).unwrap_err();
        assert_eq!(err.kind(), DensityErrorKind::DegenerateDensity);
    }

    #[test]
    fn test_linear_prices_are_degenerate() {
        let prices: Vec<f64> = STRIKES.iter().map(|k| 120.0 - k).collect();
        let smooth = fit(&prices, &STRIKES);
        let err = extract_density(&smooth, &STRIKES, 0.01, 0.1).unwrap_err();
        assert_eq!(err.kind(), DensityErrorKind::DegenerateDensity);
    }

    #[test]
    fn test_concave_prices_clamp_to_zero() {
        let prices: Vec<f64> = STRIKES.iter().map(|k| 200.0 - 0.01 * k * k).collect();
        let smooth = fit(&prices, &STRIKES);
        let err = extract_density(&smooth, &STRIKES, 0.01, 0.1).unwrap_err();
        assert_eq!(err.kind(), DensityErrorKind::DegenerateDensity);
    }

    #[test]
    fn test_strikes_outside_curve_rejected() {
        let smooth = fit(&PRICES, &STRIKES);
        let err = extract_density(&smooth, &[85.0, 95.0, 105.0], 0.01, 0.1).unwrap_err();
        assert_eq!(err.kind(), DensityErrorKind::InvalidInput);
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let smooth = fit(&PRICES, &STRIKES);
        assert!(extract_density(&smooth, &STRIKES, f64::NAN, 0.1).is_err());
        assert!(extract_density(&smooth, &STRIKES, 0.01, f64::INFINITY).is_err());
    }

    // ========================================
    // from_samples
    // ========================================

    #[test]
    fn test_from_samples_normalises() {
        let density = Density::from_samples(&[0.0, 1.0, 2.0], &[0.0, 2.0, 0.0]).unwrap();
        assert_eq!(density.values(), &[0.0, 1.0, 0.0]);
        assert_relative_eq!(density.sample_mass(), 1.0);
        assert_eq!(density.raw_area(), 2.0);
        assert_eq!(density.interpolant().degree(), 2);
    }

    #[test]
    fn test_from_samples_validation() {
        assert_eq!(
            Density::from_samples(&[1.0], &[1.0]).unwrap_err(),
            DensityError::InsufficientData { got: 1, need: 2 }
        );
        assert_eq!(
            Density::from_samples(&[1.0, 2.0], &[0.0, 0.0]).unwrap_err().kind(),
            DensityErrorKind::DegenerateDensity
        );
        assert_eq!(
            Density::from_samples(&[2.0, 1.0], &[1.0, 1.0]).unwrap_err().kind(),
            DensityErrorKind::InvalidInput
        );
        assert_eq!(
            Density::from_samples(&[1.0, 2.0], &[1.0, -1.0]).unwrap_err().kind(),
            DensityErrorKind::InvalidInput
        );
    }
}
