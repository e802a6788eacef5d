//! Health check and readiness endpoints
//!
//! Provides health and readiness endpoints for load balancer integration
//! and service availability monitoring.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Health status ("healthy" or "degraded")
    pub status: String,
    /// Server version
    pub version: String,
    /// Server uptime in seconds
    pub uptime_secs: u64,
    /// Loaded history
    pub data: DataStatus,
}

/// What the pipeline would run on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStatus {
    /// `"csv"` or `"synthetic"`
    pub source: String,
    /// Trading days available, 0 if the source failed
    pub trading_days: usize,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    /// Ready status
    pub ready: bool,
}

/// Build the health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
}

fn trading_days(state: &AppState) -> usize {
    state.quotes.trading_days().map(|d| d.len()).unwrap_or(0)
}

/// GET /health - Health check endpoint
///
/// Always 200; `status` is `"degraded"` when the history is too short for
/// `/run_pipeline`.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let days = trading_days(&state);
    let response = HealthResponse {
        status: if days >= 2 { "healthy" } else { "degraded" }.to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        data: DataStatus {
            source: state.source.to_string(),
            trading_days: days,
        },
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready - Readiness probe endpoint
///
/// Returns 200 OK once at least two trading days are loaded, 503 otherwise.
async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ready = trading_days(&state) >= 2;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyResponse { ready }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::synthetic_state;
    use adapter_loader::{SyntheticConfig, SyntheticQuoteSource};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn single_day_state() -> AppState {
        let config = SyntheticConfig {
            n_days: 1,
            ..Default::default()
        };
        let mut state = synthetic_state(2);
        state.quotes = Arc::new(SyntheticQuoteSource::generate(&config).unwrap());
        state
    }

    #[tokio::test]
    async fn test_health_endpoint_returns_json() {
        let router = routes().with_state(synthetic_state(6));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, crate::VERSION);
        assert_eq!(health.data.source, "synthetic");
        assert_eq!(health.data.trading_days, 6);
    }

    #[tokio::test]
    async fn test_health_degraded_on_short_history() {
        let router = routes().with_state(single_day_state());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "degraded");
    }

    #[tokio::test]
    async fn test_ready_endpoint() {
        let router = routes().with_state(synthetic_state(3));
        let response = router
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let router = routes().with_state(single_day_state());
        let response = router
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let ready: ReadyResponse = serde_json::from_slice(&body).unwrap();
        assert!(!ready.ready);
    }

    #[tokio::test]
    async fn test_health_response_camel_case() {
        let router = routes().with_state(synthetic_state(3));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json_str = std::str::from_utf8(&body).unwrap();

        assert!(json_str.contains("uptimeSecs"));
        assert!(json_str.contains("tradingDays"));
    }
}
