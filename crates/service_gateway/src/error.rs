//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use density_engine::DensityError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

/// Errors returned by handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected before any computation
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The estimation itself failed
    #[error("Estimation failed: {0}")]
    Estimation(#[from] DensityError),

    /// Worker or source failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status of this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Estimation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> String {
        match self {
            ApiError::BadRequest(_) => "bad_request".to_string(),
            ApiError::Estimation(e) => e.kind().to_string(),
            ApiError::Internal(_) => "internal".to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DensityError::InsufficientData { got: 1, need: 4 }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let response =
            ApiError::from(DensityError::InsufficientData { got: 1, need: 4 }).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "insufficient_data");
        assert!(body.message.contains("need at least 4"));
    }
}
