//! Dashboard statistics endpoint.

use axum::Json;
use axum::extract::State;

use roozkar_store::service::TaskService;
use roozkar_store::types::DashboardStats;

use crate::error::ApiError;
use crate::server::AppState;

/// GET /api/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::dashboard_stats(&conn)?))
}
