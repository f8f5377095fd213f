//! verso-server - REST API server for verso.
//!
//! This crate exposes a [`verso_core::UserStore`] over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use verso_core::StoreConfig;
//! use verso_server::{create_server, create_store, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = create_store(StoreConfig::default()).unwrap();
//!     let app = create_server(AppState::new(store));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::create_store;
pub use state::AppState;

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

/// Create the server with API key authentication on every route.
pub fn create_server_with_auth(state: AppState, api_key: impl Into<String>) -> Router {
    let api_key: Arc<str> = Arc::from(api_key.into());

    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn_with_state(
            api_key,
            middleware::auth_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
