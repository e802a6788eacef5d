//! Moments of an extracted density.

use density_core::math::quadrature::{AdaptiveGaussKronrod, QuadratureConfig};

use crate::error::DensityError;
use crate::extractor::Density;

/// Relative threshold below which the standard deviation counts as zero.
pub const ZERO_STD_TOLERANCE: f64 = 1e-12;

/// Mean, standard deviation, skewness and (non-excess) kurtosis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MomentRecord {
    /// `∫ x f(x) dx`
    pub mean: f64,
    /// Square root of the central second moment
    pub std_dev: f64,
    /// Third standardised moment
    pub skewness: f64,
    /// Fourth standardised moment (3 for a normal distribution)
    pub kurtosis: f64,
}

impl MomentRecord {
    /// `std_dev²`.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }
}

/// Integrate the density's moments over its support.
///
/// The mean is `∫ x f` without division by the mass, which is one up to
/// interpolation error. Higher moments are central moments about that mean,
/// standardised by powers of the standard deviation. Breakpoints sit at the
/// strike grid where the density interpolant has its knots.
///
/// # Errors
///
/// * `Integration` - a quadrature did not converge
/// * `DivisionByZero` - `std_dev <= 1e-12 * max(1, |mean|)`
pub fn estimate_moments(
    density: &Density,
    config: &QuadratureConfig,
) -> Result<MomentRecord, DensityError> {
    let integrator = AdaptiveGaussKronrod::new(*config);
    let (a, b) = density.support();
    let breakpoints = density.strikes();
    let integrate = |g: &dyn Fn(f64) -> f64| -> Result<f64, DensityError> {
        Ok(integrator
            .integrate_with_breakpoints(|x| g(x) * density.evaluate(x), a, b, breakpoints)?
            .value)
    };

    let mean = integrate(&|x| x)?;
    let variance = integrate(&|x| (x - mean).powi(2))?;
    let std_dev = variance.max(0.0).sqrt();
    if std_dev <= ZERO_STD_TOLERANCE * mean.abs().max(1.0) {
        return Err(DensityError::DivisionByZero { std_dev });
    }

    let third = integrate(&|x| (x - mean).powi(3))?;
    let fourth = integrate(&|x| (x - mean).powi(4))?;
    Ok(MomentRecord {
        mean,
        std_dev,
        skewness: third / std_dev.powi(3),
        kurtosis: fourth / variance.powi(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ========================================
    // Analytic Densities
    // ========================================

    #[test]
    fn test_uniform_density() {
        let strikes: Vec<f64> = (0..=20).map(|i| i as f64 * 0.5).collect();
        let samples = vec![1.0; strikes.len()];
        let density = Density::from_samples(&strikes, &samples).unwrap();
        let m = estimate_moments(&density, &QuadratureConfig::default()).unwrap();

        // U(0, 10)
        assert_relative_eq!(m.mean, 5.0, max_relative = 1e-10);
        assert_relative_eq!(m.variance(), 100.0 / 12.0, max_relative = 1e-10);
        assert!(m.skewness.abs() < 1e-10);
        assert_relative_eq!(m.kurtosis, 1.8, max_relative = 1e-10);
    }

    #[test]
    fn test_triangular_density_is_skewed() {
        // f(x) = 2x on [0, 1]
        let strikes: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();
        let samples: Vec<f64> = strikes.iter().map(|x| 2.0 * x).collect();
        let density = Density::from_samples(&strikes, &samples).unwrap();
        let m = estimate_moments(&density, &QuadratureConfig::default()).unwrap();

        assert_relative_eq!(m.mean, 2.0 / 3.0, max_relative = 1e-10);
        assert_relative_eq!(m.variance(), 1.0 / 18.0, max_relative = 1e-10);
        let expected_skew = -2.0 * 2f64.sqrt() / 5.0;
        assert_relative_eq!(m.skewness, expected_skew, max_relative = 1e-8);
        assert_relative_eq!(m.kurtosis, 2.4, max_relative = 1e-8);
    }

    #[test]
    fn test_variance_accessor() {
        let m = MomentRecord {
            mean: 100.0,
            std_dev: 3.0,
            skewness: 0.0,
            kurtosis: 3.0,
        };
        assert_eq!(m.variance(), 9.0);
    }

    // ========================================
    // Guards
    // ========================================

    #[test]
    fn test_zero_variance_guard() {
        let strikes = [100.0, 100.0 + 1e-13, 100.0 + 2e-13];
        let density = Density::from_samples(&strikes, &[1.0, 1.0, 1.0]).unwrap();
        let err = estimate_moments(&density, &QuadratureConfig::default()).unwrap_err();
        assert!(matches!(err, DensityError::DivisionByZero { .. }));
    }

    #[test]
    fn test_subdivision_limit_is_integration_error() {
        let strikes: Vec<f64> = (0..=20).map(|i| i as f64).collect();
        let samples: Vec<f64> = strikes.iter().map(|x| 1.0 + (x * 7.3).sin().abs()).collect();
        let density = Density::from_samples(&strikes, &samples).unwrap();
        let config = QuadratureConfig::new(1e-30, 1e-30, 1);
        let err = estimate_moments(&density, &config).unwrap_err();
        assert!(matches!(err, DensityError::Integration(_)));
    }
}
