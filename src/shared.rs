use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::database::DbFacade;
use crate::validation::ValidationError;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DbFacade + Send + Sync>,
}

impl AppState {
    pub fn new(db: Arc<dyn DbFacade + Send + Sync>) -> Self {
        Self { db }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored row broke an invariant the API guarantees
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Internal server error")]
    Internal,
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    /// For conversions of persistence records, which are not client input
    pub fn invalid_record(e: ValidationError) -> Self {
        error!(error = %e, "Stored record failed validation");
        AppError::InvalidRecord(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg),
            AppError::DatabaseError(msg) => {
                // Log the actual error, return generic message
                error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                )
            }
            AppError::InvalidRecord(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "an internal error occurred".to_string(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::database::{
        CampusRecord, InMemoryDbFacade, NewCampus, NewRoom, RoomInfoRecord, RoomWithCampus,
    };
    use async_trait::async_trait;

    /// Facade whose store is never reachable - for exercising accessor failures
    pub struct UnavailableDbFacade;

    #[async_trait]
    impl DbFacade for UnavailableDbFacade {
        fn ensure_available(&self) -> Result<(), AppError> {
            Err(AppError::Unavailable("database is offline".to_string()))
        }
        async fn ping(&self) -> Result<(), AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn list_campuses(&self) -> Result<Vec<CampusRecord>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn get_campus(&self, _id: i64) -> Result<Option<CampusRecord>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn create_campus(&self, _campus: &NewCampus) -> Result<CampusRecord, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn delete_campus(&self, _id: i64) -> Result<bool, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn list_rooms(&self) -> Result<Vec<RoomWithCampus>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn list_campus_rooms(&self, _campus_id: i64) -> Result<Vec<RoomWithCampus>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn get_room(&self, _id: i64) -> Result<Option<RoomWithCampus>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn create_room(&self, _room: &NewRoom) -> Result<RoomWithCampus, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn update_room(
            &self,
            _id: i64,
            _room: &NewRoom,
        ) -> Result<Option<RoomWithCampus>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn delete_room(&self, _id: i64) -> Result<bool, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn get_room_info(&self, _id: i64) -> Result<Option<RoomInfoRecord>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
        async fn set_room_info(
            &self,
            _id: i64,
            _purpose: &str,
            _workload: f64,
        ) -> Result<Option<RoomInfoRecord>, AppError> {
            panic!("handler must not run when the facade is unavailable")
        }
    }

    /// Facade whose stored rows break the API invariants
    ///
    /// `get_room` hands back a room with id 0, `list_rooms` a room with an empty
    /// name and `get_campus` a campus with a negative id.
    pub struct CorruptDbFacade;

    fn corrupt_room(id: i64, name: &str) -> RoomWithCampus {
        RoomWithCampus {
            room: crate::database::RoomRecord {
                id,
                name: name.to_string(),
                campus_id: None,
            },
            campus: None,
        }
    }

    #[async_trait]
    impl DbFacade for CorruptDbFacade {
        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
        async fn list_campuses(&self) -> Result<Vec<CampusRecord>, AppError> {
            Ok(Vec::new())
        }
        async fn get_campus(&self, _id: i64) -> Result<Option<CampusRecord>, AppError> {
            Ok(Some(CampusRecord {
                id: -2,
                name: "Broken".to_string(),
            }))
        }
        async fn create_campus(&self, _campus: &NewCampus) -> Result<CampusRecord, AppError> {
            Err(AppError::Internal)
        }
        async fn delete_campus(&self, _id: i64) -> Result<bool, AppError> {
            Ok(false)
        }
        async fn list_rooms(&self) -> Result<Vec<RoomWithCampus>, AppError> {
            Ok(vec![corrupt_room(1, "Lab"), corrupt_room(2, "")])
        }
        async fn list_campus_rooms(&self, _campus_id: i64) -> Result<Vec<RoomWithCampus>, AppError> {
            Ok(Vec::new())
        }
        async fn get_room(&self, _id: i64) -> Result<Option<RoomWithCampus>, AppError> {
            Ok(Some(corrupt_room(0, "Lab 3")))
        }
        async fn create_room(&self, _room: &NewRoom) -> Result<RoomWithCampus, AppError> {
            Ok(corrupt_room(0, "Lab 3"))
        }
        async fn update_room(
            &self,
            _id: i64,
            _room: &NewRoom,
        ) -> Result<Option<RoomWithCampus>, AppError> {
            Ok(None)
        }
        async fn delete_room(&self, _id: i64) -> Result<bool, AppError> {
            Ok(false)
        }
        async fn get_room_info(&self, _id: i64) -> Result<Option<RoomInfoRecord>, AppError> {
            Ok(Some(RoomInfoRecord {
                room: corrupt_room(0, "Lab 3"),
                purpose: "labs".to_string(),
                workload: 0.5,
            }))
        }
        async fn set_room_info(
            &self,
            _id: i64,
            _purpose: &str,
            _workload: f64,
        ) -> Result<Option<RoomInfoRecord>, AppError> {
            Ok(None)
        }
    }

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        db: Option<Arc<dyn DbFacade + Send + Sync>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self { db: None }
        }

        pub fn with_db(mut self, db: Arc<dyn DbFacade + Send + Sync>) -> Self {
            self.db = Some(db);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                db: self
                    .db
                    .unwrap_or_else(|| Arc::new(InMemoryDbFacade::new())),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
