//! Welcome endpoint

use axum::{response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Greeting
    pub message: String,
}

/// Build the root route
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(root_handler))
}

async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the BL + News Analysis API.".to_string(),
    })
}
