//! # density_engine: Risk-Neutral Densities and Their Moments
//!
//! Turns a curve of option prices into the market-implied density of the
//! terminal price (Breeden–Litzenberger) and summarises it by mean,
//! standard deviation, skewness and kurtosis. Snapshots at `t` and `t - 1`
//! are compared independently, and a multi-day pipeline fans comparisons
//! out over rayon.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               density_engine                 │
//! ├──────────────────────────────────────────────┤
//! │  curve/      - StrikeCurveBuilder            │
//! │  smoother/   - SmoothCurve (spline fit)      │
//! │  extractor/  - Density (e^{rτ} C'')          │
//! │  moments/    - MomentRecord (GK quadrature)  │
//! │  comparison/ - t vs t-1                      │
//! │  parallel/   - keyed rayon fan-out           │
//! │  pipeline/   - daily loop, returns, PCR      │
//! └──────────────────────────────────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────────┐
//! │                density_core                  │
//! │  B-splines, quadrature, Brent, Black-Scholes │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use density_core::analytical::BlackScholes;
//! use density_engine::{estimate_density_and_moments, DensityParams};
//!
//! let model = BlackScholes::new(100.0, 0.01, 0.2).unwrap();
//! let strikes: Vec<f64> = (40..=200).map(f64::from).collect();
//! let prices: Vec<f64> = strikes.iter().map(|&k| model.price_call(k, 0.5)).collect();
//!
//! let moments = estimate_density_and_moments(&prices, &strikes, 0.5, &DensityParams::default())
//!     .unwrap();
//! assert!((moments.mean / model.terminal_mean(0.5) - 1.0).abs() < 0.01);
//! ```
//!
//! ## Errors
//!
//! Every estimation returns `Result<_, DensityError>`. Orchestration layers
//! log failures at `warn` and keep going; one failed curve never aborts a
//! comparison, a day or a run.
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation for parameters, results and errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod comparison;
pub mod config;
pub mod curve;
pub mod error;
pub mod estimate;
pub mod extractor;
pub mod moments;
pub mod parallel;
pub mod pipeline;
pub mod smoother;
pub mod sources;

pub use comparison::{compare_snapshots, ComparisonResult, Snapshot};
pub use config::{DensityParams, PipelineConfig};
pub use curve::{DuplicatePolicy, Quote, StrikeCurve, StrikeCurveBuilder};
pub use error::{DensityError, DensityErrorKind, PipelineError, SourceError};
pub use estimate::estimate_density_and_moments;
pub use extractor::{extract_density, Density};
pub use moments::{estimate_moments, MomentRecord};
pub use parallel::{
    run_comparisons, CancellationToken, ComparisonKey, ComparisonTask, KeyedComparison,
    ParallelConfig,
};
pub use pipeline::{DailyPipeline, DailySummary};
pub use smoother::{SmoothCurve, SmoothingParams};
pub use sources::{
    NewsSource, OptionSide, QuoteRow, QuoteSource, ScoringInput, SentimentScore, SentimentScorer,
};
