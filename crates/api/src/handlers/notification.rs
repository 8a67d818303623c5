//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`]; the inbox is keyed
//! by actor id, so brands and manufacturers share these routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use brieflink_core::types::DbId;
use brieflink_db::models::notification::Notification;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::InboxParams;
use crate::response::{DataResponse, MarkedRead, UnreadCount};
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// Newest first. `limit` defaults to 20 and is capped at 100.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<InboxParams>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = state
        .workflow
        .notifications
        .list(auth.actor_id, params.unread_only, params.limit, params.offset)
        .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// 404 if the notification does not belong to the caller.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = state
        .workflow
        .notifications
        .mark_read(auth.actor_id, notification_id)
        .await?;
    Ok(Json(DataResponse { data: notification }))
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = state
        .workflow
        .notifications
        .mark_all_read(auth.actor_id)
        .await?;
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = state
        .workflow
        .notifications
        .unread_count(auth.actor_id)
        .await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}
