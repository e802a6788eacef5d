//! Quadrature configuration.

use crate::types::QuadratureError;

/// Tolerances and subdivision budget for adaptive integration.
///
/// Integration stops once the summed error estimate is at most
/// `max(abs_tolerance, rel_tolerance * |result|)`.
///
/// # Example
///
/// ```
/// use density_core::math::quadrature::QuadratureConfig;
///
/// let config = QuadratureConfig::default();
/// assert_eq!(config.max_subdivisions, 2000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuadratureConfig {
    /// Absolute error tolerance.
    pub abs_tolerance: f64,
    /// Relative error tolerance.
    pub rel_tolerance: f64,
    /// Maximum number of subintervals before giving up.
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfig {
    /// `abs_tolerance = rel_tolerance = 1.49e-8`, `max_subdivisions = 2000`.
    fn default() -> Self {
        Self {
            abs_tolerance: 1.49e-8,
            rel_tolerance: 1.49e-8,
            max_subdivisions: 2000,
        }
    }
}

impl QuadratureConfig {
    /// Create a configuration with explicit tolerances and budget.
    pub fn new(abs_tolerance: f64, rel_tolerance: f64, max_subdivisions: usize) -> Self {
        Self {
            abs_tolerance,
            rel_tolerance,
            max_subdivisions,
        }
    }

    /// Check tolerances are non-negative, not both zero, and the budget is
    /// positive.
    pub fn validate(&self) -> Result<(), QuadratureError> {
        let valid = |t: f64| t.is_finite() && t >= 0.0;
        if !valid(self.abs_tolerance) || !valid(self.rel_tolerance) {
            return Err(QuadratureError::InvalidInput(format!(
                "tolerances must be finite and non-negative (abs = {}, rel = {})",
                self.abs_tolerance, self.rel_tolerance
            )));
        }
        if self.abs_tolerance == 0.0 && self.rel_tolerance == 0.0 {
            return Err(QuadratureError::InvalidInput(
                "at least one tolerance must be positive".to_string(),
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(QuadratureError::InvalidInput(
                "max_subdivisions must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = QuadratureConfig::default();
        assert_eq!(config.abs_tolerance, 1.49e-8);
        assert_eq!(config.rel_tolerance, 1.49e-8);
        assert_eq!(config.max_subdivisions, 2000);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(QuadratureConfig::new(-1.0, 1e-8, 10).validate().is_err());
        assert!(QuadratureConfig::new(0.0, 0.0, 10).validate().is_err());
        assert!(QuadratureConfig::new(1e-8, f64::NAN, 10).validate().is_err());
        assert!(QuadratureConfig::new(1e-8, 1e-8, 0).validate().is_err());
        assert!(QuadratureConfig::new(0.0, 1e-6, 1).validate().is_ok());
    }
}
