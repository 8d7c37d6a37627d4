use axum::{http::StatusCode, Json};
use tracing::{info, instrument};

use super::{
    service::RoomService,
    types::{Room, RoomCreate, RoomInfo, RoomInfoUpdate},
};
use crate::database::Db;
use crate::shared::AppError;
use crate::validation::{IdPath, ValidJson};

/// GET /rooms
#[instrument(name = "list_rooms", skip(db))]
pub async fn list_rooms(Db(db): Db) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = RoomService::new(db).list_rooms().await?;
    info!(room_count = rooms.len(), "Rooms listed successfully");
    Ok(Json(rooms))
}

/// HTTP handler for creating a new room
///
/// POST /rooms
/// Returns the stored room with its assigned ID and resolved campus
#[instrument(name = "create_room", skip(db))]
pub async fn create_room(
    Db(db): Db,
    ValidJson(request): ValidJson<RoomCreate>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    info!(name = %request.name, "Creating new room");

    let room = RoomService::new(db).create_room(request).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /rooms/:id
#[instrument(name = "get_room", skip(db))]
pub async fn get_room(Db(db): Db, IdPath(id): IdPath) -> Result<Json<Room>, AppError> {
    let room = RoomService::new(db).get_room(id).await?;
    Ok(Json(room))
}

/// PUT /rooms/:id
#[instrument(name = "update_room", skip(db))]
pub async fn update_room(
    Db(db): Db,
    IdPath(id): IdPath,
    ValidJson(request): ValidJson<RoomCreate>,
) -> Result<Json<Room>, AppError> {
    let room = RoomService::new(db).update_room(id, request).await?;
    Ok(Json(room))
}

/// DELETE /rooms/:id
#[instrument(name = "delete_room", skip(db))]
pub async fn delete_room(Db(db): Db, IdPath(id): IdPath) -> Result<StatusCode, AppError> {
    RoomService::new(db).delete_room(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /rooms/:id/info
#[instrument(name = "get_room_info", skip(db))]
pub async fn get_room_info(Db(db): Db, IdPath(id): IdPath) -> Result<Json<RoomInfo>, AppError> {
    let info = RoomService::new(db).get_room_info(id).await?;
    Ok(Json(info))
}

/// PUT /rooms/:id/info
#[instrument(name = "set_room_info", skip(db))]
pub async fn set_room_info(
    Db(db): Db,
    IdPath(id): IdPath,
    ValidJson(update): ValidJson<RoomInfoUpdate>,
) -> Result<Json<RoomInfo>, AppError> {
    let info = RoomService::new(db).set_room_info(id, update).await?;
    Ok(Json(info))
}
