use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use tracing::{debug, info, instrument, warn};

use super::{
    CampusRecord, DbFacade, NewCampus, NewRoom, RoomInfoRecord, RoomRecord, RoomWithCampus,
};
use crate::shared::AppError;

/// SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS campuses (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS rooms (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        campus_id BIGINT REFERENCES campuses (id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS room_info (
        room_id BIGINT PRIMARY KEY REFERENCES rooms (id) ON DELETE CASCADE,
        purpose TEXT NOT NULL,
        workload DOUBLE PRECISION NOT NULL
    )",
];

const ROOM_SELECT: &str = "SELECT r.id, r.name, r.campus_id, c.name AS campus_name
    FROM rooms r LEFT JOIN campuses c ON c.id = r.campus_id";

const ROOM_INFO_SELECT: &str =
    "SELECT r.id, r.name, r.campus_id, c.name AS campus_name, i.purpose, i.workload
    FROM room_info i
    JOIN rooms r ON r.id = i.room_id
    LEFT JOIN campuses c ON c.id = r.campus_id
    WHERE r.id = $1";

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to connect to database");
            AppError::DatabaseError(e.to_string())
        })
}

#[derive(FromRow)]
struct RoomRow {
    id: i64,
    name: String,
    campus_id: Option<i64>,
    campus_name: Option<String>,
}

impl From<RoomRow> for RoomWithCampus {
    fn from(row: RoomRow) -> Self {
        let campus = match (row.campus_id, row.campus_name) {
            (Some(id), Some(name)) => Some(CampusRecord { id, name }),
            _ => None,
        };
        RoomWithCampus {
            room: RoomRecord {
                id: row.id,
                name: row.name,
                campus_id: row.campus_id,
            },
            campus,
        }
    }
}

#[derive(FromRow)]
struct RoomInfoRow {
    #[sqlx(flatten)]
    room: RoomRow,
    purpose: String,
    workload: f64,
}

impl From<RoomInfoRow> for RoomInfoRecord {
    fn from(row: RoomInfoRow) -> Self {
        RoomInfoRecord {
            room: row.room.into(),
            purpose: row.purpose,
            workload: row.workload,
        }
    }
}

fn map_db_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.code().is_some_and(|code| code == FOREIGN_KEY_VIOLATION) {
            warn!(error = %e, constraint = ?db.constraint(), "Referenced row does not exist");
            return AppError::NotFound(fk_violation_message(db.constraint()).to_string());
        }
    }

    warn!(error = %e, "Database query failed");
    AppError::DatabaseError(e.to_string())
}

/// Names the missing row from the violated constraint (Postgres default names)
fn fk_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("rooms_campus_id_fkey") => "Referenced campus not found",
        Some("room_info_room_id_fkey") => "Referenced room not found",
        _ => "Referenced row not found",
    }
}

/// PostgreSQL implementation of DbFacade
///
/// Each query checks a connection out of the pool and returns it when done.
pub struct PostgresDbFacade {
    pool: PgPool,
}

impl PostgresDbFacade {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables if they do not exist yet
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    async fn fetch_room(&self, id: i64) -> Result<Option<RoomWithCampus>, AppError> {
        let row = sqlx::query_as::<_, RoomRow>(&format!("{ROOM_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(RoomWithCampus::from))
    }
}

#[async_trait]
impl DbFacade for PostgresDbFacade {
    fn ensure_available(&self) -> Result<(), AppError> {
        if self.pool.is_closed() {
            return Err(AppError::Unavailable(
                "database connection pool is closed".to_string(),
            ));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_campuses(&self) -> Result<Vec<CampusRecord>, AppError> {
        debug!("Listing campuses in database");
        sqlx::query_as::<_, CampusRecord>("SELECT id, name FROM campuses ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn get_campus(&self, id: i64) -> Result<Option<CampusRecord>, AppError> {
        debug!(campus_id = id, "Fetching campus from database");
        sqlx::query_as::<_, CampusRecord>("SELECT id, name FROM campuses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, campus))]
    async fn create_campus(&self, campus: &NewCampus) -> Result<CampusRecord, AppError> {
        let record = sqlx::query_as::<_, CampusRecord>(
            "INSERT INTO campuses (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&campus.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        debug!(campus_id = record.id, "Campus created in database");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete_campus(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM campuses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomWithCampus>, AppError> {
        debug!("Listing rooms in database");
        let rows = sqlx::query_as::<_, RoomRow>(&format!("{ROOM_SELECT} ORDER BY r.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(RoomWithCampus::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_campus_rooms(&self, campus_id: i64) -> Result<Vec<RoomWithCampus>, AppError> {
        debug!(campus_id, "Listing campus rooms in database");
        let rows = sqlx::query_as::<_, RoomRow>(&format!(
            "{ROOM_SELECT} WHERE r.campus_id = $1 ORDER BY r.id"
        ))
        .bind(campus_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(rows.into_iter().map(RoomWithCampus::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_room(&self, id: i64) -> Result<Option<RoomWithCampus>, AppError> {
        debug!(room_id = id, "Fetching room from database");
        self.fetch_room(id).await
    }

    #[instrument(skip(self, room))]
    async fn create_room(&self, room: &NewRoom) -> Result<RoomWithCampus, AppError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO rooms (name, campus_id) VALUES ($1, $2) RETURNING id")
                .bind(&room.name)
                .bind(room.campus_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        debug!(room_id = id, "Room created in database");
        self.fetch_room(id).await?.ok_or(AppError::Internal)
    }

    #[instrument(skip(self, room))]
    async fn update_room(
        &self,
        id: i64,
        room: &NewRoom,
    ) -> Result<Option<RoomWithCampus>, AppError> {
        let result = sqlx::query("UPDATE rooms SET name = $2, campus_id = $3 WHERE id = $1")
            .bind(id)
            .bind(&room.name)
            .bind(room.campus_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            debug!(room_id = id, "Room not found for update in database");
            return Ok(None);
        }
        self.fetch_room(id).await
    }

    #[instrument(skip(self))]
    async fn delete_room(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn get_room_info(&self, id: i64) -> Result<Option<RoomInfoRecord>, AppError> {
        debug!(room_id = id, "Fetching room info from database");
        let row = sqlx::query_as::<_, RoomInfoRow>(ROOM_INFO_SELECT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(RoomInfoRecord::from))
    }

    #[instrument(skip(self, purpose))]
    async fn set_room_info(
        &self,
        id: i64,
        purpose: &str,
        workload: f64,
    ) -> Result<Option<RoomInfoRecord>, AppError> {
        if self.fetch_room(id).await?.is_none() {
            debug!(room_id = id, "Room not found for info update in database");
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO room_info (room_id, purpose, workload) VALUES ($1, $2, $3)
            ON CONFLICT (room_id) DO UPDATE SET purpose = EXCLUDED.purpose, workload = EXCLUDED.workload",
        )
        .bind(id)
        .bind(purpose)
        .bind(workload)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.get_room_info(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("rooms_campus_id_fkey"), "Referenced campus not found")]
    #[case(Some("room_info_room_id_fkey"), "Referenced room not found")]
    #[case(Some("other_fkey"), "Referenced row not found")]
    #[case(None, "Referenced row not found")]
    fn test_fk_violation_message(#[case] constraint: Option<&str>, #[case] expected: &str) {
        assert_eq!(fk_violation_message(constraint), expected);
    }

    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    async fn facade() -> PostgresDbFacade {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url, 2).await.expect("pool creation failed");
        let facade = PostgresDbFacade::new(pool);
        facade.migrate().await.expect("migration failed");
        facade
    }

    #[test]
    fn test_room_row_without_campus() {
        let row = RoomRow {
            id: 3,
            name: "Lab".to_string(),
            campus_id: None,
            campus_name: None,
        };
        let joined = RoomWithCampus::from(row);
        assert_eq!(joined.room.id, 3);
        assert!(joined.campus.is_none());
    }

    #[test]
    fn test_room_row_with_campus() {
        let row = RoomRow {
            id: 5,
            name: "Lab 3".to_string(),
            campus_id: Some(2),
            campus_name: Some("Main".to_string()),
        };
        let joined = RoomWithCampus::from(row);
        assert_eq!(
            joined.campus,
            Some(CampusRecord {
                id: 2,
                name: "Main".to_string()
            })
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_room_round_trip_through_database() {
        let db = facade().await;
        let campus = db
            .create_campus(&NewCampus {
                name: "Integration".to_string(),
            })
            .await
            .unwrap();

        let created = db
            .create_room(&NewRoom {
                name: "Lab 3".to_string(),
                campus_id: Some(campus.id),
            })
            .await
            .unwrap();
        assert_eq!(created.campus, Some(campus.clone()));

        let info = db
            .set_room_info(created.room.id, "seminars", 0.5)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.room, created);

        assert!(db.delete_room(created.room.id).await.unwrap());
        assert!(db.get_room_info(created.room.id).await.unwrap().is_none());
        assert!(db.delete_campus(campus.id).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_unknown_campus_maps_to_not_found() {
        let db = facade().await;
        let result = db
            .create_room(&NewRoom {
                name: "Orphan".to_string(),
                campus_id: Some(i64::MAX),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_closed_pool_is_unavailable() {
        let db = facade().await;
        db.pool.close().await;
        assert!(matches!(
            db.ensure_available(),
            Err(AppError::Unavailable(_))
        ));
    }
}
