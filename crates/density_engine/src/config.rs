//! Estimation and pipeline parameters.
//!
//! Both structs deserialise with defaults for missing fields (with the
//! `serde` feature) and expose `validate()` for use after loading.

use density_core::math::interpolators::MAX_DEGREE;
use density_core::math::quadrature::QuadratureConfig;

use crate::curve::DuplicatePolicy;
use crate::error::{DensityError, PipelineError};
use crate::smoother::SmoothingParams;

/// Parameters of one density/moment estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DensityParams {
    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,
    /// Target residual of the price fit (`0` interpolates)
    pub smoothing_factor: f64,
    /// Degree of the price spline
    pub spline_degree: usize,
    /// Treatment of repeated strikes
    pub duplicate_policy: DuplicatePolicy,
    /// Moment integration tolerances
    pub quadrature: QuadratureConfig,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.01,
            smoothing_factor: 0.0,
            spline_degree: 3,
            duplicate_policy: DuplicatePolicy::Reject,
            quadrature: QuadratureConfig::default(),
        }
    }
}

impl DensityParams {
    /// Spline settings for [`SmoothCurve::fit`](crate::SmoothCurve::fit).
    pub fn smoothing(&self) -> SmoothingParams {
        SmoothingParams {
            smoothing_factor: self.smoothing_factor,
            degree: self.spline_degree,
        }
    }

    /// Check ranges.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-finite rate, a negative or non-finite
    /// smoothing factor, a degree outside `1..=5`, or bad quadrature settings.
    pub fn validate(&self) -> Result<(), DensityError> {
        if !self.risk_free_rate.is_finite() {
            return Err(DensityError::InvalidInput(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if !self.smoothing_factor.is_finite() || self.smoothing_factor < 0.0 {
            return Err(DensityError::InvalidInput(format!(
                "smoothing_factor must be finite and non-negative, got {}",
                self.smoothing_factor
            )));
        }
        if !(1..=MAX_DEGREE).contains(&self.spline_degree) {
            return Err(DensityError::InvalidInput(format!(
                "spline_degree must be in 1..={}, got {}",
                MAX_DEGREE, self.spline_degree
            )));
        }
        self.quadrature
            .validate()
            .map_err(|e| DensityError::InvalidInput(e.to_string()))
    }
}

/// Settings of the multi-day comparison pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Underlying symbol passed to news and scoring collaborators
    pub ticker: String,
    /// Only expirations with at most this many days to expiry are compared
    pub max_dte: u32,
    /// Divisor converting days to expiry into years
    pub trading_days_per_year: f64,
    /// Number of most recent trading days to process
    pub n_days: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ticker: "SPY".to_string(),
            max_dte: 10,
            trading_days_per_year: 252.0,
            n_days: 10,
        }
    }
}

impl PipelineConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.ticker.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("ticker must not be empty".to_string()));
        }
        if !self.trading_days_per_year.is_finite() || self.trading_days_per_year <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "trading_days_per_year must be positive, got {}",
                self.trading_days_per_year
            )));
        }
        if self.n_days == 0 {
            return Err(PipelineError::InvalidConfig("n_days must be > 0".to_string()));
        }
        Ok(())
    }
}
