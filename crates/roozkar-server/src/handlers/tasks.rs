//! Task CRUD endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use roozkar_store::service::TaskService;
use roozkar_store::types::{
    Task, TaskCreateParams, TaskFilter, TaskPriority, TaskStatus, TaskUpdateParams,
};

use super::MessageBody;
use crate::error::{ApiError, validation};
use crate::server::AppState;

/// Query string for GET /api/tasks. Enumerated values arrive as raw
/// strings and are validated here so an unknown value surfaces as 422
/// rather than a routing-level rejection.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    /// Exact owning-list match.
    pub list_id: Option<String>,
    /// Exact status match (`pending|completed|cancelled`).
    pub status: Option<String>,
    /// Exact priority match (`low|medium|high`).
    pub priority: Option<String>,
    /// Case-insensitive substring over title or description.
    pub search: Option<String>,
}

fn task_filter(query: TaskListQuery) -> Result<TaskFilter, ApiError> {
    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(
            TaskStatus::parse(s).ok_or_else(|| validation(format!("invalid status: {s}")))?,
        ),
    };
    let priority = match query.priority.as_deref() {
        None => None,
        Some(p) => Some(
            TaskPriority::parse(p).ok_or_else(|| validation(format!("invalid priority: {p}")))?,
        ),
    };
    Ok(TaskFilter {
        list_id: query.list_id,
        status,
        priority,
        search: query.search,
    })
}

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let filter = task_filter(query)?;
    let conn = state.conn()?;
    Ok(Json(TaskService::list_tasks(&conn, &filter)?))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::get_task(&conn, &id)?))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    Json(params): Json<TaskCreateParams>,
) -> Result<Json<Task>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::create_task(&conn, &params)?))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<TaskUpdateParams>,
) -> Result<Json<Task>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::update_task(&conn, &id, &params)?))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let conn = state.conn()?;
    TaskService::delete_task(&conn, &id)?;
    Ok(Json(MessageBody {
        message: "task deleted",
    }))
}
