//! Distinct-value endpoints for the filter dropdowns.

use axum::extract::{Path, State};
use axum::response::Response;
use gridview_core::cache::cache_key;
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ValuesPayload {
    pub field: String,
    pub values: Vec<String>,
}

#[derive(Serialize)]
struct ValuesKey<'a> {
    field: &'a str,
}

/// GET /api/values/{field}
///
/// Cached under the long values TTL; field allowlisting happens in the
/// store, so unknown fields error before anything is cached.
pub async fn field_values(State(state): State<AppState>, Path(field): Path<String>) -> Result<Response, ApiError> {
    let key = cache_key(&state.config.values_namespace(), &ValuesKey { field: &field })?;
    if let Some(hit) = state.cache_get(&key).await {
        return Ok(json_body(hit, true));
    }

    let values = state.store.distinct_values(&field).await?;
    let payload = ValuesPayload { field, values };
    let body = serde_json::to_string(&payload).map_err(|e| {
        tracing::error!(error = %e, "response serialization failed");
        ApiError::Internal
    })?;

    state.cache_put(&key, &body, state.config.values_ttl_secs).await;
    Ok(json_body(body, false))
}
