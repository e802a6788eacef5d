//! Globally adaptive Gauss–Kronrod (7/15) integration.
//!
//! Each interval is integrated with the 15-point Kronrod rule; the embedded
//! 7-point Gauss rule supplies the error estimate. The interval with the
//! largest estimated error is bisected until the total error meets the
//! tolerance or the subdivision budget runs out. Known discontinuities in
//! the integrand or its derivatives can be passed as breakpoints so that
//! the initial partition already respects them.

use super::QuadratureConfig;
use crate::types::QuadratureError;

/// Kronrod abscissae on [0, 1]; odd indices are the Gauss nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights.
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights; the last one belongs to the centre.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Integral estimate with diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadratureResult {
    /// Integral estimate.
    pub value: f64,
    /// Estimated absolute error.
    pub abs_error: f64,
    /// Number of subintervals in the final partition.
    pub subdivisions: usize,
    /// Number of integrand evaluations.
    pub evaluations: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Adaptive Gauss–Kronrod integrator.
///
/// # Example
///
/// ```
/// use density_core::math::quadrature::AdaptiveGaussKronrod;
///
/// let integrator = AdaptiveGaussKronrod::with_defaults();
/// let result = integrator
///     .integrate(|x: f64| x.sin(), 0.0, std::f64::consts::PI)
///     .unwrap();
/// assert!((result.value - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveGaussKronrod {
    config: QuadratureConfig,
}

impl AdaptiveGaussKronrod {
    /// Create an integrator with the given configuration.
    pub fn new(config: QuadratureConfig) -> Self {
        Self { config }
    }

    /// Create an integrator with default tolerances.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Current configuration.
    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Integrate `f` over `[a, b]`.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<QuadratureResult, QuadratureError>
    where
        F: Fn(f64) -> f64,
    {
        self.integrate_with_breakpoints(f, a, b, &[])
    }

    /// Integrate `f` over `[a, b]`, starting from a partition split at the
    /// given breakpoints. Points outside `(a, b)` are ignored.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - bounds not finite, `a > b`, or bad configuration
    /// * `NonFinite` - the integrand produced NaN or infinity
    /// * `SubdivisionLimit` - tolerance not met within `max_subdivisions`
    /// * `Roundoff` - an interval could not be bisected further
    pub fn integrate_with_breakpoints<F>(
        &self,
        f: F,
        a: f64,
        b: f64,
        breakpoints: &[f64],
    ) -> Result<QuadratureResult, QuadratureError>
    where
        F: Fn(f64) -> f64,
    {
        self.config.validate()?;
        if !a.is_finite() || !b.is_finite() {
            return Err(QuadratureError::InvalidInput(format!(
                "bounds must be finite, got [{}, {}]",
                a, b
            )));
        }
        if a > b {
            return Err(QuadratureError::InvalidInput(format!(
                "lower bound {} exceeds upper bound {}",
                a, b
            )));
        }
        if a == b {
            return Ok(QuadratureResult {
                value: 0.0,
                abs_error: 0.0,
                subdivisions: 0,
                evaluations: 0,
            });
        }

        let mut points: Vec<f64> = breakpoints
            .iter()
            .copied()
            .filter(|p| p.is_finite() && *p > a && *p < b)
            .collect();
        points.sort_by(|x, y| x.total_cmp(y));
        points.dedup();

        let mut edges = Vec::with_capacity(points.len() + 2);
        edges.push(a);
        edges.extend(points);
        edges.push(b);

        let mut evaluations = 0;
        let mut segments = Vec::with_capacity(edges.len() - 1);
        for w in edges.windows(2) {
            segments.push(kronrod_segment(&f, w[0], w[1])?);
            evaluations += 15;
        }

        loop {
            let value: f64 = segments.iter().map(|s| s.value).sum();
            let abs_error: f64 = segments.iter().map(|s| s.error).sum();
            let tolerance = self
                .config
                .abs_tolerance
                .max(self.config.rel_tolerance * value.abs());

            if abs_error <= tolerance {
                return Ok(QuadratureResult {
                    value,
                    abs_error,
                    subdivisions: segments.len(),
                    evaluations,
                });
            }
            if segments.len() >= self.config.max_subdivisions {
                return Err(QuadratureError::SubdivisionLimit {
                    limit: self.config.max_subdivisions,
                    abs_error,
                });
            }

            let worst = segments
                .iter()
                .enumerate()
                .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let Segment { a: lo, b: hi, .. } = segments[worst];
            let mid = 0.5 * (lo + hi);
            if !(mid > lo && mid < hi) {
                return Err(QuadratureError::Roundoff { a: lo, b: hi });
            }

            segments[worst] = kronrod_segment(&f, lo, mid)?;
            segments.push(kronrod_segment(&f, mid, hi)?);
            evaluations += 30;
        }
    }
}

/// 15-point Kronrod estimate on `[a, b]` with the QUADPACK error heuristic.
fn kronrod_segment<F>(f: &F, a: f64, b: f64) -> Result<Segment, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    let centre = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let abs_half = half.abs();

    let f_centre = f(centre);
    let mut gauss = f_centre * WG[3];
    let mut kronrod = f_centre * WGK[7];
    let mut abs_sum = kronrod.abs();
    let mut left = [0.0; 7];
    let mut right = [0.0; 7];

    for j in 0..7 {
        let offset = half * XGK[j];
        let fl = f(centre - offset);
        let fr = f(centre + offset);
        left[j] = fl;
        right[j] = fr;
        kronrod += WGK[j] * (fl + fr);
        abs_sum += WGK[j] * (fl.abs() + fr.abs());
        if j % 2 == 1 {
            gauss += WG[j / 2] * (fl + fr);
        }
    }

    let mean = 0.5 * kronrod;
    let mut asc = WGK[7] * (f_centre - mean).abs();
    for j in 0..7 {
        asc += WGK[j] * ((left[j] - mean).abs() + (right[j] - mean).abs());
    }

    let value = kronrod * half;
    let resabs = abs_sum * abs_half;
    let resasc = asc * abs_half;
    let mut error = ((kronrod - gauss) * half).abs();
    if resasc != 0.0 && error != 0.0 {
        error = resasc * (200.0 * error / resasc).powf(1.5).min(1.0);
    }
    if resabs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * resabs);
    }

    if !value.is_finite() || !error.is_finite() {
        return Err(QuadratureError::NonFinite { a, b });
    }
    Ok(Segment { a, b, value, error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ========================================
    // Accuracy Tests
    // ========================================

    #[test]
    fn test_polynomial_is_exact() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let result = integrator
            .integrate(|x: f64| 3.0 * x.powi(5) - x * x + 2.0, -1.0, 2.0)
            .unwrap();
        // [x^6/2 - x^3/3 + 2x] from -1 to 2
        let exact = (32.0 - 8.0 / 3.0 + 4.0) - (0.5 + 1.0 / 3.0 - 2.0);
        assert_relative_eq!(result.value, exact, max_relative = 1e-13);
        assert_eq!(result.subdivisions, 1);
        assert_eq!(result.evaluations, 15);
    }

    #[test]
    fn test_gaussian_mass() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let pdf = |x: f64| (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt();
        let result = integrator.integrate(pdf, -10.0, 10.0).unwrap();
        assert_relative_eq!(result.value, 1.0, max_relative = 1e-10);
        assert!(result.abs_error < 1e-8);
    }

    #[test]
    fn test_kink_needs_subdivision() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let result = integrator
            .integrate(|x: f64| (x - 0.3).abs(), 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(result.value, 0.045 + 0.245, max_relative = 1e-9);
        assert!(result.subdivisions > 1);
    }

    #[test]
    fn test_breakpoint_at_kink() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let result = integrator
            .integrate_with_breakpoints(|x: f64| (x - 0.3).abs(), 0.0, 1.0, &[0.3, 0.3, 5.0])
            .unwrap();
        assert_relative_eq!(result.value, 0.29, max_relative = 1e-13);
        assert_eq!(result.subdivisions, 2);
    }

    #[test]
    fn test_step_function_with_breakpoints() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let step = |x: f64| if x < 1.0 { 0.0 } else { 2.0 };
        let result = integrator
            .integrate_with_breakpoints(step, 0.0, 3.0, &[1.0])
            .unwrap();
        assert_relative_eq!(result.value, 4.0, max_relative = 1e-14);
    }

    // ========================================
    // Failure Modes
    // ========================================

    #[test]
    fn test_empty_interval() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let result = integrator.integrate(|x: f64| x, 2.0, 2.0).unwrap();
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_invalid_bounds() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        assert!(matches!(
            integrator.integrate(|x: f64| x, 1.0, 0.0),
            Err(QuadratureError::InvalidInput(_))
        ));
        assert!(matches!(
            integrator.integrate(|x: f64| x, 0.0, f64::INFINITY),
            Err(QuadratureError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_integrand() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let result = integrator.integrate(|_| f64::NAN, 0.0, 1.0);
        assert!(matches!(result, Err(QuadratureError::NonFinite { .. })));
    }

    #[test]
    fn test_subdivision_limit() {
        let config = QuadratureConfig::new(1e-14, 1e-14, 3);
        let integrator = AdaptiveGaussKronrod::new(config);
        let result = integrator.integrate(|x: f64| (50.0 * x).sin().abs(), 0.0, 1.0);
        assert!(matches!(
            result,
            Err(QuadratureError::SubdivisionLimit { limit: 3, .. })
        ));
    }

    #[test]
    fn test_singularity_reports_error() {
        let integrator = AdaptiveGaussKronrod::with_defaults();
        let result = integrator.integrate(|x: f64| 1.0 / x, 0.0, 1.0);
        assert!(result.is_err());
    }
}
