//! Route definitions for the REST API.

mod batch;
mod health;
mod query;
mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // User operations
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Batch and query dispatch
        .route("/batch", post(batch::batch))
        .route("/query", get(query::query))
        // Attach state
        .with_state(state)
}

pub use batch::*;
pub use health::*;
pub use query::*;
pub use users::*;
