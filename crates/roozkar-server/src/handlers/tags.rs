//! Tag endpoints. Tags have no update operation, and deleting one does
//! not touch tasks that reference it.

use axum::Json;
use axum::extract::{Path, State};

use roozkar_store::service::TaskService;
use roozkar_store::types::{Tag, TagCreateParams};

use super::MessageBody;
use crate::error::ApiError;
use crate::server::AppState;

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::list_tags(&conn)?))
}

/// POST /api/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Json(params): Json<TagCreateParams>,
) -> Result<Json<Tag>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(TaskService::create_tag(&conn, &params)?))
}

/// DELETE /api/tags/{id}
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let conn = state.conn()?;
    TaskService::delete_tag(&conn, &id)?;
    Ok(Json(MessageBody {
        message: "tag deleted",
    }))
}
