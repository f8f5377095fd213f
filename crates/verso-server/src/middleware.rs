//! Middleware for the REST API server.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::ApiError;

/// Create CORS middleware.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Request logging middleware.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

/// API key authentication middleware.
///
/// Accepts `Authorization: Bearer <key>` or `Authorization: Token <key>`.
pub async fn auth_middleware(
    State(api_key): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .or_else(|| header.strip_prefix("Token "))
        });

    let rejection = match token {
        Some(token) if token == &*api_key => None,
        Some(_) => {
            warn!(uri = %request.uri(), "Rejected request with invalid API key");
            Some(ApiError::unauthorized("Invalid API key"))
        }
        None => Some(ApiError::unauthorized("Missing API key")),
    };

    match rejection {
        Some(err) => Err(err),
        None => Ok(next.run(request).await),
    }
}
