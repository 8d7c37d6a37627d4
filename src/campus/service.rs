use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::types::{Campus, CampusCreate};
use crate::database::{DbFacade, NewCampus};
use crate::room::types::Room;
use crate::shared::AppError;
use crate::validation::PositiveId;

/// Service for campus operations on top of the database facade
pub struct CampusService {
    db: Arc<dyn DbFacade + Send + Sync>,
}

impl CampusService {
    pub fn new(db: Arc<dyn DbFacade + Send + Sync>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_campuses(&self) -> Result<Vec<Campus>, AppError> {
        let records = self.db.list_campuses().await?;
        debug!(campus_count = records.len(), "Campuses retrieved");

        records
            .into_iter()
            .map(|record| Campus::try_from(record).map_err(AppError::invalid_record))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_campus(&self, id: PositiveId) -> Result<Campus, AppError> {
        let record = self
            .db
            .get_campus(id.get())
            .await?
            .ok_or_else(|| campus_not_found(id))?;
        Campus::try_from(record).map_err(AppError::invalid_record)
    }

    #[instrument(skip(self))]
    pub async fn create_campus(&self, request: CampusCreate) -> Result<Campus, AppError> {
        let record = self.db.create_campus(&NewCampus::from(request)).await?;
        let campus = Campus::try_from(record).map_err(AppError::invalid_record)?;

        info!(campus_id = %campus.id, name = %campus.name, "Campus created");
        Ok(campus)
    }

    #[instrument(skip(self))]
    pub async fn delete_campus(&self, id: PositiveId) -> Result<(), AppError> {
        if !self.db.delete_campus(id.get()).await? {
            return Err(campus_not_found(id));
        }
        info!(campus_id = %id, "Campus deleted");
        Ok(())
    }

    /// Rooms that reference the campus; the campus itself must exist
    #[instrument(skip(self))]
    pub async fn list_campus_rooms(&self, id: PositiveId) -> Result<Vec<Room>, AppError> {
        if self.db.get_campus(id.get()).await?.is_none() {
            return Err(campus_not_found(id));
        }

        self.db
            .list_campus_rooms(id.get())
            .await?
            .into_iter()
            .map(|record| Room::try_from(record).map_err(AppError::invalid_record))
            .collect()
    }
}

fn campus_not_found(id: PositiveId) -> AppError {
    AppError::NotFound(format!("Campus {} not found", id))
}
