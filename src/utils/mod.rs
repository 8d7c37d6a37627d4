// Public API - what other modules can use
pub use handlers::{health, list_groups};

// Internal modules
mod handlers;

use axum::{routing::get, Router};

use crate::shared::AppState;

/// Routes mounted under `/utils`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/groups", get(list_groups))
}
