//! Error types for density extraction and moment estimation.
//!
//! Every variant describes the failure of a single invocation (one curve,
//! one time point). Callers that loop over expirations or days record the
//! error and move on.

use density_core::types::{InterpolationError, QuadratureError};
use thiserror::Error;

/// Failure of one density/moment estimation.
///
/// # Examples
/// ```
/// use density_engine::{DensityError, DensityErrorKind};
///
/// let err = DensityError::InsufficientData { got: 2, need: 4 };
/// assert_eq!(err.kind(), DensityErrorKind::InsufficientData);
/// assert!(err.to_string().contains("need at least 4"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DensityError {
    /// Too few distinct strikes for the requested spline degree.
    #[error("Insufficient data: got {got} distinct strikes, need at least {need}")]
    InsufficientData {
        /// Distinct strikes available
        got: usize,
        /// Minimum required (`degree + 1`)
        need: usize,
    },

    /// Caller contract violation: mismatched lengths, NaN or negative prices,
    /// non-finite strikes or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The same strike appeared more than once under `DuplicatePolicy::Reject`.
    #[error("Duplicate strike {strike}")]
    DuplicateStrike {
        /// The repeated strike
        strike: f64,
    },

    /// Spline fitting or evaluation failed.
    #[error("Curve fit failed: {0}")]
    Fit(#[from] InterpolationError),

    /// Zero-width support or no probability mass left after clamping.
    #[error("Degenerate density: {0}")]
    DegenerateDensity(String),

    /// Adaptive quadrature did not converge.
    #[error("Integration failed: {0}")]
    Integration(#[from] QuadratureError),

    /// Standard deviation indistinguishable from zero; skewness and
    /// kurtosis are undefined.
    #[error("Standard deviation {std_dev:e} is indistinguishable from zero")]
    DivisionByZero {
        /// The computed standard deviation
        std_dev: f64,
    },

    /// Skipped because cancellation was requested before it started.
    #[error("Cancelled before evaluation")]
    Cancelled,
}

/// Field-less tag of a [`DensityError`], used for counting and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DensityErrorKind {
    /// See [`DensityError::InsufficientData`]
    InsufficientData,
    /// See [`DensityError::InvalidInput`]
    InvalidInput,
    /// See [`DensityError::DuplicateStrike`]
    DuplicateStrike,
    /// See [`DensityError::Fit`]
    Fit,
    /// See [`DensityError::DegenerateDensity`]
    DegenerateDensity,
    /// See [`DensityError::Integration`]
    Integration,
    /// See [`DensityError::DivisionByZero`]
    DivisionByZero,
    /// See [`DensityError::Cancelled`]
    Cancelled,
}

impl DensityError {
    /// The error's kind tag.
    pub fn kind(&self) -> DensityErrorKind {
        match self {
            DensityError::InsufficientData { .. } => DensityErrorKind::InsufficientData,
            DensityError::InvalidInput(_) => DensityErrorKind::InvalidInput,
            DensityError::DuplicateStrike { .. } => DensityErrorKind::DuplicateStrike,
            DensityError::Fit(_) => DensityErrorKind::Fit,
            DensityError::DegenerateDensity(_) => DensityErrorKind::DegenerateDensity,
            DensityError::Integration(_) => DensityErrorKind::Integration,
            DensityError::DivisionByZero { .. } => DensityErrorKind::DivisionByZero,
            DensityError::Cancelled => DensityErrorKind::Cancelled,
        }
    }
}

impl DensityErrorKind {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DensityErrorKind::InsufficientData => "insufficient_data",
            DensityErrorKind::InvalidInput => "invalid_input",
            DensityErrorKind::DuplicateStrike => "duplicate_strike",
            DensityErrorKind::Fit => "fit",
            DensityErrorKind::DegenerateDensity => "degenerate_density",
            DensityErrorKind::Integration => "integration",
            DensityErrorKind::DivisionByZero => "division_by_zero",
            DensityErrorKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DensityErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a multi-day pipeline run as a whole.
///
/// Per-comparison failures never surface here; they are recorded as
/// [`DensityError`] values inside the results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Fewer than two trading days are available.
    #[error("Not enough trading days: got {got}, need at least 2")]
    NotEnoughDays {
        /// Trading days in the source
        got: usize,
    },

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The quote source could not be read.
    #[error("Quote source error: {0}")]
    Source(#[from] SourceError),
}

/// Failure reading from a quote source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The underlying file or stream could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// A record could not be parsed.
    #[error("Parse error at record {record}: {message}")]
    Parse {
        /// 1-based record number
        record: usize,
        /// What went wrong
        message: String,
    },
}
