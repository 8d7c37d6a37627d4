// Public API - what other modules can use
pub use handlers::{
    create_room, delete_room, get_room, get_room_info, list_rooms, set_room_info, update_room,
};

// Internal modules
mod handlers;
pub mod service;
pub mod types;

use axum::{routing::get, Router};

use crate::shared::AppState;

/// Routes mounted under `/rooms`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/:id", get(get_room).put(update_room).delete(delete_room))
        .route("/:id/info", get(get_room_info).put(set_room_info))
}
