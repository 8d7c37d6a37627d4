use serde::{Deserialize, Deserializer, Serialize};

use crate::campus::types::Campus;
use crate::database::{NewRoom, RoomInfoRecord, RoomWithCampus};
use crate::validation::{NonEmptyName, PositiveId, ValidationError};

/// Request payload for creating or replacing a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCreate {
    pub name: NonEmptyName,
    #[serde(default, deserialize_with = "deserialize_campus_id")]
    pub campus_id: Option<PositiveId>,
}

fn deserialize_campus_id<'de, D>(deserializer: D) -> Result<Option<PositiveId>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer)?
        .map(|value| PositiveId::for_field("campus_id", value))
        .transpose()
        .map_err(serde::de::Error::custom)
}

impl From<RoomCreate> for NewRoom {
    fn from(request: RoomCreate) -> Self {
        NewRoom {
            name: request.name.into_inner(),
            campus_id: request.campus_id.map(PositiveId::get),
        }
    }
}

/// Room as returned by the API
///
/// Carries every `RoomCreate` field plus the assigned `id` and, when the room
/// belongs to one, the resolved campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: PositiveId,
    pub name: NonEmptyName,
    pub campus_id: Option<PositiveId>,
    pub campus: Option<Campus>,
}

impl TryFrom<RoomWithCampus> for Room {
    type Error = ValidationError;

    fn try_from(record: RoomWithCampus) -> Result<Self, Self::Error> {
        let id = PositiveId::for_field("id", record.room.id)?;
        let campus_id = record
            .room
            .campus_id
            .map(|value| PositiveId::for_field("campus_id", value))
            .transpose()?;
        let campus = record.campus.map(Campus::try_from).transpose()?;

        if let Some(campus) = &campus {
            if campus_id != Some(campus.id) {
                return Err(ValidationError::Invalid {
                    field: "campus",
                    reason: format!(
                        "campus {} does not match campus_id {:?}",
                        campus.id,
                        campus_id.map(PositiveId::get)
                    ),
                });
            }
        }

        Ok(Room {
            id,
            name: NonEmptyName::new(record.room.name)?,
            campus_id,
            campus,
        })
    }
}

/// Read-only view of a room with its usage details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub room: Room,
    pub purpose: String,
    pub workload: f64,
}

impl TryFrom<RoomInfoRecord> for RoomInfo {
    type Error = ValidationError;

    fn try_from(record: RoomInfoRecord) -> Result<Self, Self::Error> {
        Ok(RoomInfo {
            room: Room::try_from(record.room)?,
            purpose: record.purpose,
            workload: record.workload,
        })
    }
}

/// Request payload for setting a room's usage details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfoUpdate {
    pub purpose: String,
    pub workload: f64,
}

impl RoomInfoUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.workload.is_finite() || self.workload < 0.0 {
            return Err(ValidationError::Invalid {
                field: "workload",
                reason: format!("must be a non-negative number, got {}", self.workload),
            });
        }
        Ok(())
    }
}
