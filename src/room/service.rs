use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::types::{Room, RoomCreate, RoomInfo, RoomInfoUpdate};
use crate::database::{DbFacade, NewRoom};
use crate::shared::AppError;
use crate::validation::PositiveId;

/// Service for room operations on top of the database facade
pub struct RoomService {
    db: Arc<dyn DbFacade + Send + Sync>,
}

impl RoomService {
    pub fn new(db: Arc<dyn DbFacade + Send + Sync>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Result<Vec<Room>, AppError> {
        let records = self.db.list_rooms().await?;
        debug!(room_count = records.len(), "Rooms retrieved");

        records
            .into_iter()
            .map(|record| Room::try_from(record).map_err(AppError::invalid_record))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_room(&self, id: PositiveId) -> Result<Room, AppError> {
        let record = self
            .db
            .get_room(id.get())
            .await?
            .ok_or_else(|| room_not_found(id))?;
        Room::try_from(record).map_err(AppError::invalid_record)
    }

    #[instrument(skip(self))]
    pub async fn create_room(&self, request: RoomCreate) -> Result<Room, AppError> {
        let record = self.db.create_room(&NewRoom::from(request)).await?;
        let room = Room::try_from(record).map_err(AppError::invalid_record)?;

        info!(room_id = %room.id, name = %room.name, "Room created");
        Ok(room)
    }

    #[instrument(skip(self))]
    pub async fn update_room(&self, id: PositiveId, request: RoomCreate) -> Result<Room, AppError> {
        let record = self
            .db
            .update_room(id.get(), &NewRoom::from(request))
            .await?
            .ok_or_else(|| room_not_found(id))?;
        let room = Room::try_from(record).map_err(AppError::invalid_record)?;

        info!(room_id = %room.id, "Room updated");
        Ok(room)
    }

    #[instrument(skip(self))]
    pub async fn delete_room(&self, id: PositiveId) -> Result<(), AppError> {
        if !self.db.delete_room(id.get()).await? {
            return Err(room_not_found(id));
        }
        info!(room_id = %id, "Room deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_room_info(&self, id: PositiveId) -> Result<RoomInfo, AppError> {
        let record = self
            .db
            .get_room_info(id.get())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Info for room {} not found", id)))?;
        RoomInfo::try_from(record).map_err(AppError::invalid_record)
    }

    #[instrument(skip(self))]
    pub async fn set_room_info(
        &self,
        id: PositiveId,
        update: RoomInfoUpdate,
    ) -> Result<RoomInfo, AppError> {
        update.validate()?;

        let record = self
            .db
            .set_room_info(id.get(), &update.purpose, update.workload)
            .await?
            .ok_or_else(|| room_not_found(id))?;

        info!(room_id = %id, workload = update.workload, "Room info stored");
        RoomInfo::try_from(record).map_err(AppError::invalid_record)
    }
}

fn room_not_found(id: PositiveId) -> AppError {
    AppError::NotFound(format!("Room {} not found", id))
}
