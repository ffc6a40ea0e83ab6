//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::Result;
use crate::models::{ClearResponse, DeleteResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// Holds the same cache instance injected into the resolvers.
#[derive(Clone)]
pub struct AppState {
    /// Shared query cache
    pub cache: Arc<TtlCache>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Arc<TtlCache>) -> Self {
        Self { cache }
    }

    /// Creates a new AppState with a fresh cache built from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Arc::new(TtlCache::from_config(config)?)))
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear();
    info!("Cache cleared via admin API");
    Json(ClearResponse::cleared())
}

/// Handler for DELETE /cache/:key
///
/// Succeeds whether or not the key was present.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let removed = state.cache.delete(&key);
    Json(DeleteResponse::new(key, removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
