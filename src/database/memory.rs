use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::{
    CampusRecord, DbFacade, NewCampus, NewRoom, RoomInfoRecord, RoomRecord, RoomWithCampus,
};
use crate::shared::AppError;

#[derive(Default)]
struct Store {
    campuses: BTreeMap<i64, CampusRecord>,
    rooms: BTreeMap<i64, RoomRecord>,
    room_info: HashMap<i64, (String, f64)>,
    last_campus_id: i64,
    last_room_id: i64,
}

impl Store {
    fn join(&self, room: &RoomRecord) -> RoomWithCampus {
        RoomWithCampus {
            room: room.clone(),
            campus: room
                .campus_id
                .and_then(|campus_id| self.campuses.get(&campus_id).cloned()),
        }
    }

    fn check_campus(&self, campus_id: Option<i64>) -> Result<(), AppError> {
        match campus_id {
            Some(campus_id) if !self.campuses.contains_key(&campus_id) => {
                warn!(campus_id, "Referenced campus does not exist");
                Err(AppError::NotFound(format!("Campus {} not found", campus_id)))
            }
            _ => Ok(()),
        }
    }

    fn info(&self, id: i64) -> Option<RoomInfoRecord> {
        let room = self.rooms.get(&id)?;
        let (purpose, workload) = self.room_info.get(&id)?;
        Some(RoomInfoRecord {
            room: self.join(room),
            purpose: purpose.clone(),
            workload: *workload,
        })
    }
}

/// In-memory implementation of DbFacade for development and testing
///
/// Mirrors the referential behaviour of the PostgreSQL schema: ids start at 1,
/// rooms must reference an existing campus, deleting a campus detaches its
/// rooms, and deleting a room drops its info.
pub struct InMemoryDbFacade {
    store: Mutex<Store>,
}

impl Default for InMemoryDbFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDbFacade {
    /// Creates a new empty in-memory facade
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store::default()),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, AppError> {
        self.store.lock().map_err(|_| {
            warn!("In-memory store lock poisoned");
            AppError::Internal
        })
    }
}

#[async_trait]
impl DbFacade for InMemoryDbFacade {
    async fn ping(&self) -> Result<(), AppError> {
        self.store().map(|_| ())
    }

    #[instrument(skip(self))]
    async fn list_campuses(&self) -> Result<Vec<CampusRecord>, AppError> {
        debug!("Listing campuses in memory");
        Ok(self.store()?.campuses.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn get_campus(&self, id: i64) -> Result<Option<CampusRecord>, AppError> {
        debug!(campus_id = id, "Fetching campus from memory");
        Ok(self.store()?.campuses.get(&id).cloned())
    }

    #[instrument(skip(self, campus))]
    async fn create_campus(&self, campus: &NewCampus) -> Result<CampusRecord, AppError> {
        let mut store = self.store()?;
        store.last_campus_id += 1;
        let record = CampusRecord {
            id: store.last_campus_id,
            name: campus.name.clone(),
        };
        store.campuses.insert(record.id, record.clone());

        debug!(campus_id = record.id, name = %record.name, "Campus created in memory");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete_campus(&self, id: i64) -> Result<bool, AppError> {
        let mut store = self.store()?;
        if store.campuses.remove(&id).is_none() {
            debug!(campus_id = id, "Campus not found for deletion in memory");
            return Ok(false);
        }

        // ON DELETE SET NULL
        for room in store.rooms.values_mut() {
            if room.campus_id == Some(id) {
                room.campus_id = None;
            }
        }

        debug!(campus_id = id, "Campus deleted from memory");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomWithCampus>, AppError> {
        debug!("Listing rooms in memory");
        let store = self.store()?;
        Ok(store.rooms.values().map(|room| store.join(room)).collect())
    }

    #[instrument(skip(self))]
    async fn list_campus_rooms(&self, campus_id: i64) -> Result<Vec<RoomWithCampus>, AppError> {
        debug!(campus_id, "Listing campus rooms in memory");
        let store = self.store()?;
        Ok(store
            .rooms
            .values()
            .filter(|room| room.campus_id == Some(campus_id))
            .map(|room| store.join(room))
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_room(&self, id: i64) -> Result<Option<RoomWithCampus>, AppError> {
        debug!(room_id = id, "Fetching room from memory");
        let store = self.store()?;
        Ok(store.rooms.get(&id).map(|room| store.join(room)))
    }

    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &NewRoom) -> Result<RoomWithCampus, AppError> {
        let mut store = self.store()?;
        store.check_campus(room.campus_id)?;

        store.last_room_id += 1;
        let record = RoomRecord {
            id: store.last_room_id,
            name: room.name.clone(),
            campus_id: room.campus_id,
        };
        store.rooms.insert(record.id, record.clone());

        debug!(room_id = record.id, name = %record.name, "Room created in memory");
        Ok(store.join(&record))
    }

    #[instrument(skip(self, room))]
    async fn update_room(
        &self,
        id: i64,
        room: &NewRoom,
    ) -> Result<Option<RoomWithCampus>, AppError> {
        let mut store = self.store()?;
        if !store.rooms.contains_key(&id) {
            debug!(room_id = id, "Room not found for update in memory");
            return Ok(None);
        }
        store.check_campus(room.campus_id)?;

        let record = RoomRecord {
            id,
            name: room.name.clone(),
            campus_id: room.campus_id,
        };
        store.rooms.insert(id, record.clone());

        debug!(room_id = id, "Room updated in memory");
        Ok(Some(store.join(&record)))
    }

    #[instrument(skip(self))]
    async fn delete_room(&self, id: i64) -> Result<bool, AppError> {
        let mut store = self.store()?;
        let existed = store.rooms.remove(&id).is_some();
        store.room_info.remove(&id);

        debug!(room_id = id, existed, "Room deletion processed in memory");
        Ok(existed)
    }

    #[instrument(skip(self))]
    async fn get_room_info(&self, id: i64) -> Result<Option<RoomInfoRecord>, AppError> {
        debug!(room_id = id, "Fetching room info from memory");
        Ok(self.store()?.info(id))
    }

    #[instrument(skip(self, purpose))]
    async fn set_room_info(
        &self,
        id: i64,
        purpose: &str,
        workload: f64,
    ) -> Result<Option<RoomInfoRecord>, AppError> {
        let mut store = self.store()?;
        if !store.rooms.contains_key(&id) {
            debug!(room_id = id, "Room not found for info update in memory");
            return Ok(None);
        }
        store
            .room_info
            .insert(id, (purpose.to_string(), workload));

        debug!(room_id = id, workload, "Room info stored in memory");
        Ok(store.info(id))
    }
}
