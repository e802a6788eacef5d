//! Single-estimation endpoint
//!
//! `POST /api/v1/density` runs one `estimate_density_and_moments` call on
//! the blocking pool. Parameters missing from the request fall back to the
//! gateway's configured defaults.

use axum::{extract::State, response::Json, routing::post, Router};
use density_engine::{estimate_density_and_moments, DensityParams, MomentRecord};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

/// Body of `POST /api/v1/density`
#[derive(Debug, Clone, Deserialize)]
pub struct DensityRequest {
    /// Strikes in any order
    pub strikes: Vec<f64>,
    /// Option prices aligned with `strikes`
    pub prices: Vec<f64>,
    /// Time to maturity in years
    pub time_to_maturity: f64,
    /// Overrides of the configured parameters
    #[serde(default)]
    pub params: Option<DensityParams>,
}

/// Response of `POST /api/v1/density`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityResponse {
    /// Time to maturity in years
    pub time_to_maturity: f64,
    /// Number of quotes received
    pub quotes: usize,
    /// Moments of the implied density
    pub moments: MomentRecord,
}

/// Build the density route
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/density", post(density_handler))
}

async fn density_handler(
    State(state): State<AppState>,
    Json(request): Json<DensityRequest>,
) -> Result<Json<DensityResponse>, ApiError> {
    if request.strikes.len() != request.prices.len() {
        return Err(ApiError::BadRequest(format!(
            "{} strikes but {} prices",
            request.strikes.len(),
            request.prices.len()
        )));
    }
    if !request.time_to_maturity.is_finite() || request.time_to_maturity <= 0.0 {
        return Err(ApiError::BadRequest(format!(
            "time_to_maturity must be positive, got {}",
            request.time_to_maturity
        )));
    }

    let params = request.params.unwrap_or(state.config.density);
    params.validate()?;

    let tau = request.time_to_maturity;
    let quotes = request.strikes.len();
    let moments = tokio::task::spawn_blocking(move || {
        estimate_density_and_moments(&request.prices, &request.strikes, tau, &params)
    })
    .await??;

    Ok(Json(DensityResponse {
        time_to_maturity: tau,
        quotes,
        moments,
    }))
}
