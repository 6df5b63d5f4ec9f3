//! HTTP routes for the gridview API.

pub mod accounts;
pub mod cache_admin;
pub mod export;
pub mod health;
pub mod values;

use axum::{
    Router,
    http::{HeaderName, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Assemble the full router with tracing and CORS layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/accounts", get(accounts::list_accounts))
        .route("/api/accounts/export", get(export::export_csv))
        .route("/api/values/{field}", get(values::field_values))
        .route("/api/cache/flush", post(cache_admin::flush))
        .route("/api/cache/stats", get(cache_admin::stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JSON response from a pre-serialized body, tagged with cache outcome.
pub(crate) fn json_body(body: String, cache_hit: bool) -> Response {
    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            HeaderName::from_static("x-cache"),
            if cache_hit { "hit" } else { "miss" }.to_string(),
        ),
    ];
    (headers, body).into_response()
}
