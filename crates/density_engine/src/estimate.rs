//! Single-invocation entry point.

use crate::config::DensityParams;
use crate::curve::StrikeCurveBuilder;
use crate::error::DensityError;
use crate::extractor::extract_density;
use crate::moments::{estimate_moments, MomentRecord};
use crate::smoother::SmoothCurve;

/// Estimate the risk-neutral density implied by one curve of call prices and
/// return its moments.
///
/// Runs build → fit → extract → integrate. Strikes may arrive in any order.
/// `time_to_maturity` is in years.
///
/// # Errors
///
/// Any [`DensityError`] raised by a stage; nothing is retried.
///
/// # Examples
/// ```
/// use density_engine::{estimate_density_and_moments, DensityParams};
///
/// let strikes = [90.0, 95.0, 100.0, 105.0, 110.0];
/// let prices = [12.0, 8.0, 5.0, 2.5, 1.0];
/// let m = estimate_density_and_moments(&prices, &strikes, 10.0 / 252.0, &DensityParams::default())
///     .unwrap();
///
/// assert!(m.mean > 90.0 && m.mean < 110.0);
/// assert!(m.std_dev > 0.0);
/// ```
pub fn estimate_density_and_moments(
    prices: &[f64],
    strikes: &[f64],
    time_to_maturity: f64,
    params: &DensityParams,
) -> Result<MomentRecord, DensityError> {
    params.validate()?;
    let curve = StrikeCurveBuilder::new(params.spline_degree)
        .with_duplicate_policy(params.duplicate_policy)
        .build(prices, strikes)?;
    let smooth = SmoothCurve::fit(&curve, params.smoothing())?;
    let density = extract_density(
        &smooth,
        curve.strikes(),
        params.risk_free_rate,
        time_to_maturity,
    )?;
    estimate_moments(&density, &params.quadrature)
}
