// Public API - what other modules can use
pub use memory::InMemoryDbFacade;
pub use postgres::{create_pool, PostgresDbFacade};

// Internal modules
mod memory;
mod postgres;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::warn;

use crate::shared::{AppError, AppState};

/// Database row for the campuses table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CampusRecord {
    pub id: i64,
    pub name: String,
}

/// Database row for the rooms table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: i64,
    pub name: String,
    pub campus_id: Option<i64>,
}

/// A room joined with the campus it references, if any
#[derive(Debug, Clone, PartialEq)]
pub struct RoomWithCampus {
    pub room: RoomRecord,
    pub campus: Option<CampusRecord>,
}

/// A room together with its usage details
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfoRecord {
    pub room: RoomWithCampus,
    pub purpose: String,
    pub workload: f64,
}

/// Values needed to insert or replace a room
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub name: String,
    pub campus_id: Option<i64>,
}

/// Values needed to insert a campus
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampus {
    pub name: String,
}

/// Capability interface over the persistence layer
///
/// Handlers only ever see this trait; whether rows live in PostgreSQL or in
/// memory is decided once at startup when `AppState` is built.
#[async_trait]
pub trait DbFacade {
    /// Checked by the `Db` extractor before any handler runs
    fn ensure_available(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError>;

    async fn list_campuses(&self) -> Result<Vec<CampusRecord>, AppError>;
    async fn get_campus(&self, id: i64) -> Result<Option<CampusRecord>, AppError>;
    async fn create_campus(&self, campus: &NewCampus) -> Result<CampusRecord, AppError>;
    /// Rooms on the deleted campus keep existing with no campus
    async fn delete_campus(&self, id: i64) -> Result<bool, AppError>;

    async fn list_rooms(&self) -> Result<Vec<RoomWithCampus>, AppError>;
    async fn list_campus_rooms(&self, campus_id: i64) -> Result<Vec<RoomWithCampus>, AppError>;
    async fn get_room(&self, id: i64) -> Result<Option<RoomWithCampus>, AppError>;

    /// Fails with `AppError::NotFound` when `campus_id` names no campus
    async fn create_room(&self, room: &NewRoom) -> Result<RoomWithCampus, AppError>;
    async fn update_room(&self, id: i64, room: &NewRoom)
        -> Result<Option<RoomWithCampus>, AppError>;
    async fn delete_room(&self, id: i64) -> Result<bool, AppError>;

    async fn get_room_info(&self, id: i64) -> Result<Option<RoomInfoRecord>, AppError>;
    /// Returns `None` when the room does not exist
    async fn set_room_info(
        &self,
        id: i64,
        purpose: &str,
        workload: f64,
    ) -> Result<Option<RoomInfoRecord>, AppError>;
}

/// Resolves the request's database facade from application state.
///
/// Fails before the handler is reached if the facade cannot serve requests.
pub fn get_db_facade(state: &AppState) -> Result<Arc<dyn DbFacade + Send + Sync>, AppError> {
    if let Err(e) = state.db.ensure_available() {
        warn!(error = %e, "Database facade unavailable, rejecting request");
        return Err(e);
    }
    Ok(Arc::clone(&state.db))
}

/// Extractor handing a ready facade to handlers: `Db(db): Db`
pub struct Db(pub Arc<dyn DbFacade + Send + Sync>);

#[async_trait]
impl FromRequestParts<AppState> for Db {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        get_db_facade(state).map(Db)
    }
}
