//! Closed-form reference models.
//!
//! - Black-Scholes call/put prices and the lognormal terminal density
//! - Standard normal CDF/PDF

pub mod black_scholes;
pub mod distributions;
pub mod error;

pub use black_scholes::BlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
