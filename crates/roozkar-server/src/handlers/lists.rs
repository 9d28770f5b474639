//! List CRUD endpoints. List update is a full replace, and list delete
//! cascades to the tasks in the list.

use axum::Json;
use axum::extract::{Path, State};

use roozkar_store::service::TaskService;
use roozkar_store::types::{ListParams, TaskList};

use super::MessageBody;
use crate::error::ApiError;
use crate::server::AppState;

/// GET /api/lists
pub async fn list_lists(State(state): State<AppState>) -> Result<Json<Vec<TaskList>>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::list_lists(&conn)?))
}

/// POST /api/lists
pub async fn create_list(
    State(state): State<AppState>,
    Json(params): Json<ListParams>,
) -> Result<Json<TaskList>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::create_list(&conn, &params)?))
}

/// PUT /api/lists/{id}
pub async fn update_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<ListParams>,
) -> Result<Json<TaskList>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::update_list(&conn, &id, &params)?))
}

/// DELETE /api/lists/{id}
pub async fn delete_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let conn = state.conn()?;
    TaskService::delete_list(&conn, &id)?;
    Ok(Json(MessageBody {
        message: "list and its tasks deleted",
    }))
}
