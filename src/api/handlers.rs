//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio_util::sync::CancellationToken;

use crate::cache::DistributedCache;
use crate::error::{CacheError, Result};
use crate::models::{
    GcResponse, GetResponse, HealthResponse, KeyResponse, SetRequest, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DistributedCache>,
    /// Cancelled on server shutdown; aborts garbage collection started over HTTP
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(cache: Arc<DistributedCache>) -> Self {
        Self::with_shutdown(cache, CancellationToken::new())
    }

    pub fn with_shutdown(cache: Arc<DistributedCache>, shutdown: CancellationToken) -> Self {
        Self { cache, shutdown }
    }
}

/// Handler for PUT /entries/:key
///
/// Stores a value with optional sliding and absolute expiration.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let options = req.options().map_err(CacheError::InvalidRequest)?;
    state
        .cache
        .set(&key, req.value.into_bytes(), &options)
        .await?;

    Ok(Json(KeyResponse::new(key, "set")))
}

/// Handler for GET /entries/:key
///
/// Missing and expired entries both answer 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, &value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for POST /entries/:key/refresh
pub async fn refresh_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    state.cache.refresh(&key).await?;
    Ok(Json(KeyResponse::new(key, "refreshed")))
}

/// Handler for DELETE /entries/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    state.cache.remove(&key).await?;
    Ok(Json(KeyResponse::new(key, "deleted")))
}

/// Handler for POST /gc
///
/// Runs one garbage-collection pass and reports what it removed.
pub async fn gc_handler(State(state): State<AppState>) -> Result<Json<GcResponse>> {
    let report = state
        .cache
        .collect_garbage(&state.shutdown.child_token())
        .await?;
    Ok(Json(report.into()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.collection()))
}
