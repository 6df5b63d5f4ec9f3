//! gridview server entry point.
//!
//! Boots the HTTP API: loads configuration, opens the account store (fatal
//! on failure) and the cache store (non-fatal; the API serves uncached when
//! the cache cannot be opened), then serves the axum router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use gridview_core::{AppConfig, CacheDb, StoreDb};
use tracing_subscriber::EnvFilter;

mod csv;
mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::load()?;

    let store = StoreDb::open(&config.store_db_path).await?;

    let cache = if config.cache_enabled {
        match CacheDb::open(&config.cache_db_path).await {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!(error = %e, "cache unavailable; serving uncached");
                None
            }
        }
    } else {
        None
    };

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!(%addr, cache_enabled = cache.is_some(), "starting gridview server");

    let state = state::AppState { config: Arc::new(config), store, cache };
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
