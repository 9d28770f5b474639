//! Subtask endpoints, operating on the sequence embedded in a task.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use roozkar_store::service::TaskService;
use roozkar_store::types::{Subtask, SubtaskCreateParams};

use super::MessageBody;
use crate::error::ApiError;
use crate::server::AppState;

/// Response for a newly appended subtask.
#[derive(Debug, Serialize)]
pub struct SubtaskCreated {
    /// Confirmation message.
    pub message: &'static str,
    /// The created subtask.
    pub subtask: Subtask,
}

/// Body for PUT …/subtasks/{subtask_id}.
#[derive(Debug, Deserialize)]
pub struct SubtaskCompletion {
    /// New completion flag.
    pub completed: bool,
}

/// POST /api/tasks/{id}/subtasks
pub async fn add_subtask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<SubtaskCreateParams>,
) -> Result<Json<SubtaskCreated>, ApiError> {
    let conn = state.conn()?;
    let subtask = TaskService::add_subtask(&conn, &id, &params)?;
    Ok(Json(SubtaskCreated {
        message: "subtask added",
        subtask,
    }))
}

/// PUT /api/tasks/{id}/subtasks/{subtask_id}
pub async fn update_subtask(
    State(state): State<AppState>,
    Path((id, subtask_id)): Path<(String, String)>,
    Json(params): Json<SubtaskCompletion>,
) -> Result<Json<MessageBody>, ApiError> {
    let conn = state.conn()?;
    TaskService::set_subtask_completed(&conn, &id, &subtask_id, params.completed)?;
    Ok(Json(MessageBody {
        message: "subtask status updated",
    }))
}

/// DELETE /api/tasks/{id}/subtasks/{subtask_id}
pub async fn delete_subtask(
    State(state): State<AppState>,
    Path((id, subtask_id)): Path<(String, String)>,
) -> Result<Json<MessageBody>, ApiError> {
    let conn = state.conn()?;
    TaskService::remove_subtask(&conn, &id, &subtask_id)?;
    Ok(Json(MessageBody {
        message: "subtask deleted",
    }))
}
