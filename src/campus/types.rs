use serde::{Deserialize, Serialize};

use crate::database::{CampusRecord, NewCampus};
use crate::validation::{NonEmptyName, PositiveId, ValidationError};

/// Request payload for creating a campus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusCreate {
    pub name: NonEmptyName,
}

impl From<CampusCreate> for NewCampus {
    fn from(request: CampusCreate) -> Self {
        NewCampus {
            name: request.name.into_inner(),
        }
    }
}

/// Campus as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    pub id: PositiveId,
    pub name: String,
}

impl TryFrom<CampusRecord> for Campus {
    type Error = ValidationError;

    fn try_from(record: CampusRecord) -> Result<Self, Self::Error> {
        Ok(Campus {
            id: PositiveId::for_field("campus.id", record.id)?,
            name: record.name,
        })
    }
}
