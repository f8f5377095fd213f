//! Server state management.

use std::sync::Arc;

use verso_core::UserStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
}

impl AppState {
    /// Create state around an already-built store.
    pub fn new(store: UserStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
