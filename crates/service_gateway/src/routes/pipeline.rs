//! Multi-day pipeline endpoint
//!
//! `GET /run_pipeline?n_days=N` runs the day-over-day comparison over the
//! loaded history on the blocking pool. If the request is dropped before
//! the run finishes, comparisons not yet started are cancelled.

use adapter_loader::MomentTrendScorer;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use density_engine::{CancellationToken, DailyPipeline, DailySummary, PipelineError};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::error::ApiError;

/// Status string of a successful run
pub const STATUS_SUCCESS: &str = "success";

/// Status string when the history is too short
pub const STATUS_NO_DATA: &str = "No data or not enough days to run pipeline.";

/// Query of `GET /run_pipeline`
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineQuery {
    /// Most recent trading days to process
    pub n_days: Option<usize>,
}

/// Body of `GET /run_pipeline`
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResponse {
    /// `"success"` or the no-data message
    pub status: String,
    /// Requested window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_days: Option<usize>,
    /// One row per processed day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<DailySummary>>,
}

/// Cancels the wrapped token when dropped.
struct CancelOnDrop(CancellationToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Build the pipeline route
pub fn routes() -> Router<AppState> {
    Router::new().route("/run_pipeline", get(run_pipeline_handler))
}

async fn run_pipeline_handler(
    State(state): State<AppState>,
    Query(query): Query<PipelineQuery>,
) -> Result<Json<PipelineResponse>, ApiError> {
    let n_days = query.n_days.unwrap_or(state.config.pipeline.n_days);
    if n_days == 0 || n_days > state.config.max_n_days {
        return Err(ApiError::BadRequest(format!(
            "n_days must be in 1..={}, got {}",
            state.config.max_n_days, n_days
        )));
    }

    let token = CancellationToken::new();
    let _guard = CancelOnDrop(token.clone());
    let config = state.config.clone();
    let pipeline = DailyPipeline::new(
        state.quotes.clone(),
        state.news.clone(),
        MomentTrendScorer::new(config.scorer),
        config.pipeline.clone(),
    )
    .with_density_params(config.density);

    let result = tokio::task::spawn_blocking(move || pipeline.run(n_days, &token, None)).await?;

    match result {
        Ok(rows) => {
            info!(n_days, rows = rows.len(), "pipeline finished");
            Ok(Json(PipelineResponse {
                status: STATUS_SUCCESS.to_string(),
                n_days: Some(n_days),
                data: Some(rows),
            }))
        }
        Err(PipelineError::NotEnoughDays { got }) => {
            info!(got, "not enough trading days");
            Ok(Json(PipelineResponse {
                status: STATUS_NO_DATA.to_string(),
                n_days: None,
                data: None,
            }))
        }
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}
