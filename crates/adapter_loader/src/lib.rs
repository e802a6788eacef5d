//! # adapter_loader: Collaborators for the Density Pipeline
//!
//! Concrete implementations of the `density_engine` collaborator traits:
//!
//! - [`CsvQuoteSource`]: end-of-day option chains from CSV
//! - [`SyntheticQuoteSource`]: seeded Black-Scholes chains for demos and tests
//! - [`JsonNewsSource`] / [`EmptyNewsSource`]: headlines per day
//! - [`NeutralScorer`] / [`MomentTrendScorer`]: daily sentiment
//!
//! ## Example
//!
//! ```
//! use adapter_loader::{EmptyNewsSource, MomentTrendScorer, SyntheticConfig, SyntheticQuoteSource};
//! use density_engine::{CancellationToken, DailyPipeline, PipelineConfig};
//!
//! let quotes = SyntheticQuoteSource::generate(&SyntheticConfig::default()).unwrap();
//! let pipeline = DailyPipeline::new(
//!     quotes,
//!     EmptyNewsSource,
//!     MomentTrendScorer::default(),
//!     PipelineConfig::default(),
//! );
//! let rows = pipeline.run(3, &CancellationToken::new(), None).unwrap();
//! assert_eq!(rows.len(), 3);
//! ```

#![deny(missing_docs)]

pub mod csv_source;
pub mod error;
pub mod news;
pub mod scoring;
pub mod synthetic;

pub use csv_source::CsvQuoteSource;
pub use error::LoaderError;
pub use news::{EmptyNewsSource, JsonNewsSource};
pub use scoring::{MomentTrendScorer, NeutralScorer, Thresholds, TrendScorerConfig};
pub use synthetic::{SyntheticConfig, SyntheticQuoteSource};
