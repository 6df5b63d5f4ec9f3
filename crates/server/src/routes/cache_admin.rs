//! Cache administration: manual flush and the monitor stats endpoint.
//!
//! Both endpoints answer normally when the cache is disabled; flushing an
//! absent cache deletes nothing and stats report `enabled: false`.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlushRequest {
    /// `all` (default), `data`, `values`, or `expired`.
    pub scope: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlushResponse {
    pub deleted: u64,
}

/// POST /api/cache/flush
pub async fn flush(
    State(state): State<AppState>, body: Option<Json<FlushRequest>>,
) -> Result<Json<FlushResponse>, ApiError> {
    let scope = body.and_then(|Json(req)| req.scope);
    let prefix = match scope.as_deref() {
        None | Some("all") => Some(state.config.flush_prefix()),
        Some("data") => Some(state.config.data_namespace()),
        Some("values") => Some(state.config.values_namespace()),
        Some("expired") => None,
        Some(other) => return Err(ApiError::BadRequest(format!("unknown flush scope: {other}"))),
    };

    let Some(cache) = state.cache.as_ref() else {
        return Ok(Json(FlushResponse { deleted: 0 }));
    };

    let deleted = match &prefix {
        Some(prefix) => cache.purge_prefix(prefix).await?,
        None => cache.purge_expired().await?,
    };
    tracing::info!(scope = scope.as_deref().unwrap_or("all"), deleted, "cache flushed");
    Ok(Json(FlushResponse { deleted }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub enabled: bool,
    pub entries: u64,
    pub expired: u64,
    pub oldest_created_at: Option<String>,
    pub newest_created_at: Option<String>,
}

/// GET /api/cache/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let Some(cache) = state.cache.as_ref() else {
        return Ok(Json(StatsResponse {
            enabled: false,
            entries: 0,
            expired: 0,
            oldest_created_at: None,
            newest_created_at: None,
        }));
    };

    let stats = cache.stats().await?;
    Ok(Json(StatsResponse {
        enabled: true,
        entries: stats.entries,
        expired: stats.expired,
        oldest_created_at: stats.oldest_created_at,
        newest_created_at: stats.newest_created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn test_flush_all_scopes_prefix() {
        let state = test_state(true).await;
        let cache = state.cache.as_ref().unwrap();
        cache.put("gridview:data:a", "{}", 3600).await.unwrap();
        cache.put("gridview:values:b", "{}", 3600).await.unwrap();
        cache.put("other:app:c", "{}", 3600).await.unwrap();

        let Json(response) = flush(State(state.clone()), None).await.unwrap();
        assert_eq!(response.deleted, 2);

        // foreign prefixes untouched
        assert!(cache.get("other:app:c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_flush_data_scope_only() {
        let state = test_state(true).await;
        let cache = state.cache.as_ref().unwrap();
        cache.put("gridview:data:a", "{}", 3600).await.unwrap();
        cache.put("gridview:values:b", "{}", 3600).await.unwrap();

        let body = Some(Json(FlushRequest { scope: Some("data".to_string()) }));
        let Json(response) = flush(State(state.clone()), body).await.unwrap();
        assert_eq!(response.deleted, 1);
        assert!(cache.get("gridview:values:b").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_flush_expired_scope() {
        let state = test_state(true).await;
        let cache = state.cache.as_ref().unwrap();
        cache.put("gridview:data:live", "{}", 3600).await.unwrap();
        cache.put("gridview:data:stale", "{}", -1).await.unwrap();

        let body = Some(Json(FlushRequest { scope: Some("expired".to_string()) }));
        let Json(response) = flush(State(state.clone()), body).await.unwrap();
        assert_eq!(response.deleted, 1);
        assert!(cache.get("gridview:data:live").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_flush_unknown_scope_rejected() {
        let state = test_state(true).await;
        let body = Some(Json(FlushRequest { scope: Some("everything".to_string()) }));
        let err = flush(State(state), body).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_flush_disabled_cache_is_noop() {
        let state = test_state(false).await;
        let Json(response) = flush(State(state), None).await.unwrap();
        assert_eq!(response.deleted, 0);
    }

    #[tokio::test]
    async fn test_stats_reports_entries() {
        let state = test_state(true).await;
        state.cache.as_ref().unwrap().put("gridview:data:a", "{}", 3600).await.unwrap();

        let Json(response) = stats(State(state)).await.unwrap();
        assert!(response.enabled);
        assert_eq!(response.entries, 1);
        assert!(response.newest_created_at.is_some());
    }

    #[tokio::test]
    async fn test_stats_disabled_cache() {
        let state = test_state(false).await;
        let Json(response) = stats(State(state)).await.unwrap();
        assert!(!response.enabled);
        assert_eq!(response.entries, 0);
    }
}
