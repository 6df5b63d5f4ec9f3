//! Shared application state for the axum router.
//!
//! Handles are acquired once in `main` and injected here; no handler opens
//! its own connections. The cache handle is optional, and the helpers below
//! turn every cache failure into a logged miss so the store path always runs.

use std::sync::Arc;

use gridview_core::{AppConfig, CacheDb, StoreDb};

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: StoreDb,
    /// `None` when the cache is disabled or failed to open at startup.
    pub cache: Option<CacheDb>,
}

impl AppState {
    /// Look-aside read: `None` on disabled cache, miss, or cache error.
    pub async fn cache_get(&self, key: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key, "cache read failed; treating as miss");
                None
            }
        }
    }

    /// Look-aside write: failures are logged, never propagated.
    pub async fn cache_put(&self, key: &str, value: &str, ttl_seconds: i64) {
        let Some(cache) = self.cache.as_ref() else { return };
        if let Err(e) = cache.put(key, value, ttl_seconds).await {
            tracing::warn!(error = %e, key, "cache write failed; response served uncached");
        }
    }
}

/// In-memory state for handler tests.
#[cfg(test)]
pub(crate) async fn test_state(with_cache: bool) -> AppState {
    let store = StoreDb::open_in_memory().await.unwrap();
    let cache = if with_cache { Some(CacheDb::open_in_memory().await.unwrap()) } else { None };
    AppState { config: Arc::new(AppConfig::default()), store, cache }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_helpers_without_cache() {
        let state = test_state(false).await;
        assert!(state.cache_get("k").await.is_none());
        // must be a no-op, not a panic
        state.cache_put("k", "{}", 60).await;
    }

    #[tokio::test]
    async fn test_cache_helpers_round_trip() {
        let state = test_state(true).await;
        assert!(state.cache_get("k").await.is_none());
        state.cache_put("k", "{}", 60).await;
        assert_eq!(state.cache_get("k").await.unwrap(), "{}");
    }
}
