// Public API - what other modules can use
pub use handlers::{create_campus, delete_campus, get_campus, list_campus_rooms, list_campuses};

// Internal modules
mod handlers;
pub mod service;
pub mod types;

use axum::{routing::get, Router};

use crate::shared::AppState;

/// Routes mounted under `/campuses`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_campuses).post(create_campus))
        .route("/:id", get(get_campus).delete(delete_campus))
        .route("/:id/rooms", get(list_campus_rooms))
}
