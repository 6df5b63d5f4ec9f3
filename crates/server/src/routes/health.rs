//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub cache_enabled: bool,
}

/// GET /health
///
/// 200 when the account store answers; 503 otherwise. Cache state is
/// reported but never affects the status code.
pub async fn health(State(state): State<AppState>) -> Response {
    let cache_enabled = state.cache.is_some();
    match state.store.ping().await {
        Ok(()) => {
            let body = HealthResponse { status: "ok".to_string(), cache_enabled };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "account store unreachable");
            let body = HealthResponse { status: "unavailable".to_string(), cache_enabled };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}
