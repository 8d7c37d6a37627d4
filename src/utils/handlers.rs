use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::api::{RouteGroup, API_GROUPS};
use crate::database::Db;
use crate::shared::AppError;

/// GET /utils/health
///
/// Round-trips to the store so a broken connection shows up here.
#[instrument(name = "health", skip(db))]
pub async fn health(Db(db): Db) -> Result<Json<Value>, AppError> {
    db.ping().await?;
    debug!("Health check passed");
    Ok(Json(json!({ "status": "ok" })))
}

/// GET /utils/groups
pub async fn list_groups() -> Json<Vec<RouteGroup>> {
    Json(API_GROUPS.to_vec())
}
