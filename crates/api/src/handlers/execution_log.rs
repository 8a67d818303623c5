//! Handlers for `/briefs/{id}/execution-log`.
//!
//! Access is decided by the execution log service: the brief owner and the
//! accepted manufacturer only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use brieflink_core::execution_log::NewLogEntry;
use brieflink_core::types::DbId;
use brieflink_db::models::execution_log::ExecutionLogEntry;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/briefs/{id}/execution-log
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ExecutionLogEntry>>>> {
    let entries = state
        .workflow
        .execution_log
        .list_for_brief(brief_id, auth.actor_id)
        .await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/briefs/{id}/execution-log
pub async fn append(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
    Json(entry): Json<NewLogEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<ExecutionLogEntry>>)> {
    let created = state
        .workflow
        .execution_log
        .append(brief_id, auth.actor_id, entry)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
