use axum::{http::StatusCode, Json};
use tracing::{info, instrument};

use super::{
    service::CampusService,
    types::{Campus, CampusCreate},
};
use crate::database::Db;
use crate::room::types::Room;
use crate::shared::AppError;
use crate::validation::{IdPath, ValidJson};

/// GET /campuses
#[instrument(name = "list_campuses", skip(db))]
pub async fn list_campuses(Db(db): Db) -> Result<Json<Vec<Campus>>, AppError> {
    let campuses = CampusService::new(db).list_campuses().await?;
    info!(campus_count = campuses.len(), "Campuses listed successfully");
    Ok(Json(campuses))
}

/// POST /campuses
#[instrument(name = "create_campus", skip(db))]
pub async fn create_campus(
    Db(db): Db,
    ValidJson(request): ValidJson<CampusCreate>,
) -> Result<(StatusCode, Json<Campus>), AppError> {
    let campus = CampusService::new(db).create_campus(request).await?;
    Ok((StatusCode::CREATED, Json(campus)))
}

/// GET /campuses/:id
#[instrument(name = "get_campus", skip(db))]
pub async fn get_campus(Db(db): Db, IdPath(id): IdPath) -> Result<Json<Campus>, AppError> {
    let campus = CampusService::new(db).get_campus(id).await?;
    Ok(Json(campus))
}

/// DELETE /campuses/:id
///
/// Rooms on the campus are kept and lose their campus reference.
#[instrument(name = "delete_campus", skip(db))]
pub async fn delete_campus(Db(db): Db, IdPath(id): IdPath) -> Result<StatusCode, AppError> {
    CampusService::new(db).delete_campus(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /campuses/:id/rooms
#[instrument(name = "list_campus_rooms", skip(db))]
pub async fn list_campus_rooms(
    Db(db): Db,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = CampusService::new(db).list_campus_rooms(id).await?;
    info!(campus_id = %id, room_count = rooms.len(), "Campus rooms listed");
    Ok(Json(rooms))
}
