//! Route modules for the gateway
//!
//! This module contains endpoint group-specific routers:
//! - root: welcome message
//! - pipeline: multi-day pipeline over the loaded history
//! - density: single density/moment estimation
//! - health: Health check and readiness endpoints

pub mod density;
pub mod health;
pub mod pipeline;
pub mod root;

use std::sync::Arc;

use adapter_loader::{
    CsvQuoteSource, EmptyNewsSource, JsonNewsSource, SyntheticConfig, SyntheticQuoteSource,
};
use axum::Router;
use density_engine::{NewsSource, QuoteSource};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ServerConfig};

/// Shared option-chain history
pub type SharedQuotes = Arc<dyn QuoteSource + Send + Sync>;

/// Shared news source
pub type SharedNews = Arc<dyn NewsSource + Send + Sync>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Option chains served to the pipeline
    pub quotes: SharedQuotes,
    /// News served to the scorer
    pub news: SharedNews,
    /// Where the quotes come from, for health reporting
    pub source: &'static str,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// State over explicit sources
    pub fn new(
        config: Arc<ServerConfig>,
        quotes: SharedQuotes,
        news: SharedNews,
        source: &'static str,
    ) -> Self {
        Self {
            config,
            quotes,
            news,
            source,
            start_time: std::time::Instant::now(),
        }
    }

    /// Load the sources named in `config`
    ///
    /// The CSV in `data_path` when set, otherwise a synthetic history of
    /// `synthetic_days` trading days.
    pub fn load(config: Arc<ServerConfig>) -> Result<Self, ConfigError> {
        let quotes: SharedQuotes = match &config.data_path {
            Some(path) => Arc::new(
                CsvQuoteSource::from_path(path).map_err(|e| ConfigError::Data(e.to_string()))?,
            ),
            None => {
                let synthetic = SyntheticConfig {
                    n_days: config.synthetic_days,
                    rate: config.density.risk_free_rate,
                    trading_days_per_year: config.pipeline.trading_days_per_year,
                    ..Default::default()
                };
                Arc::new(
                    SyntheticQuoteSource::generate(&synthetic)
                        .map_err(|e| ConfigError::Data(e.to_string()))?,
                )
            }
        };
        let source = if config.data_path.is_some() {
            "csv"
        } else {
            "synthetic"
        };
        let news: SharedNews = match &config.news_path {
            Some(path) => Arc::new(
                JsonNewsSource::from_path(path).map_err(|e| ConfigError::Data(e.to_string()))?,
            ),
            None => Arc::new(EmptyNewsSource),
        };
        Ok(Self::new(config, quotes, news, source))
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(state: AppState) -> Router {
    let allow_cors = state.config.allow_cors;
    let router = Router::new()
        .merge(root::routes())
        .merge(pipeline::routes())
        .merge(density::routes())
        .merge(health::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if allow_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// State over a short synthetic history.
    pub fn synthetic_state(days: usize) -> AppState {
        let config = ServerConfig {
            synthetic_days: days,
            ..Default::default()
        };
        AppState::load(Arc::new(config)).unwrap()
    }
}
