// Library crate for the campus rooms API
// This file exposes the public API for integration tests

pub mod api;
pub mod campus;
pub mod config;
pub mod database;
pub mod room;
pub mod shared;
pub mod utils;
pub mod validation;

// Re-export commonly used types for easier access in tests
pub use api::{api_router, app, API_GROUPS};
pub use config::AppConfig;
pub use database::{DbFacade, InMemoryDbFacade, PostgresDbFacade};
pub use shared::{AppError, AppState};
