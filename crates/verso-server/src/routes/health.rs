//! Health check endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub record_count: u64,
    pub version: String,
}

/// Health check endpoint.
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let info = state.store.info().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        backend: info.backend,
        record_count: info.record_count,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
