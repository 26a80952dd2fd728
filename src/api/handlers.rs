//! API Handlers
//!
//! HTTP request handlers for the peer-serving endpoint and the admin API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use crate::cache::ByteView;
use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{GetResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups served by this node
    pub registry: Arc<GroupRegistry>,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self { registry }
    }
}

/// Resolves the group and runs its (possibly blocking) read path on the
/// blocking pool.
async fn fetch(state: &AppState, group: &str, key: String) -> Result<ByteView> {
    let group = state
        .registry
        .get(group)
        .ok_or_else(|| CacheError::GroupNotFound(group.to_string()))?;

    tokio::task::spawn_blocking(move || group.get(&key))
        .await
        .map_err(|err| CacheError::Internal(format!("load task failed: {err}")))?
}

/// Handler for GET /_gazelle/:group/:key
///
/// Serves raw value bytes to other nodes.
pub async fn peer_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    debug!(group = %group, key = %key, "peer request");
    let value = fetch(&state, &group, key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.bytes(),
    ))
}

/// Handler for GET /_gazelle/:group/ (empty key)
pub async fn peer_empty_key_handler(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<impl IntoResponse> {
    peer_handler(State(state), Path((group, String::new()))).await
}

/// Handler for GET /api/:group/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let value = fetch(&state, &group, key.clone()).await?;

    Ok(Json(GetResponse::new(group, key, value.to_string_lossy())))
}

/// Handler for GET /api/:group/ (empty key)
pub async fn get_empty_key_handler(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<GetResponse>> {
    get_handler(State(state), Path((group, String::new()))).await
}

/// Handler for GET /stats/:group
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<StatsResponse>> {
    let group = state
        .registry
        .get(&group)
        .ok_or_else(|| CacheError::GroupNotFound(group.clone()))?;

    Ok(Json(StatsResponse::new(
        group.name(),
        group.stats(),
        group.store().stats(),
    )))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.registry.names()))
}
