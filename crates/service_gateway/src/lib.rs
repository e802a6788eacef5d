//! REST gateway for risk-neutral density dynamics
//!
//! Serves the day-over-day pipeline (`GET /run_pipeline`), single density
//! estimation (`POST /api/v1/density`) and health probes over an option-chain
//! history loaded at startup from CSV or generated synthetically.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
