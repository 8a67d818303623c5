//! Handlers for the `/briefs` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use brieflink_core::brief::{BriefFields, BriefListFilter, BriefPatch};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;
use brieflink_workflow::views::BriefPage;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireBrand;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/briefs
pub async fn create(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Json(input): Json<BriefFields>,
) -> AppResult<(StatusCode, Json<DataResponse<Brief>>)> {
    let brief = state.workflow.briefs.create(brand.brand_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: brief })))
}

/// GET /api/v1/briefs
///
/// The caller's own briefs. Supports `status`, `category`, `sort`,
/// `direction`, `limit` and `offset`.
pub async fn list(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Query(filter): Query<BriefListFilter>,
) -> AppResult<Json<DataResponse<BriefPage>>> {
    let page = state
        .workflow
        .briefs
        .list_by_owner(brand.brand_id, filter)
        .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/briefs/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Brief>>> {
    let brief = state.workflow.briefs.get(id).await?;
    Ok(Json(DataResponse { data: brief }))
}

/// PUT /api/v1/briefs/{id}
pub async fn update(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<BriefPatch>,
) -> AppResult<Json<DataResponse<Brief>>> {
    let brief = state
        .workflow
        .briefs
        .update(id, brand.brand_id, patch)
        .await?;
    Ok(Json(DataResponse { data: brief }))
}

/// DELETE /api/v1/briefs/{id}
pub async fn delete(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.workflow.briefs.delete(id, brand.brand_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/briefs/{id}/publish
pub async fn publish(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Brief>>> {
    let brief = state.workflow.briefs.publish(id, brand.brand_id).await?;
    Ok(Json(DataResponse { data: brief }))
}

/// POST /api/v1/briefs/{id}/cancel
pub async fn cancel(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Brief>>> {
    let brief = state.workflow.briefs.cancel(id, brand.brand_id).await?;
    Ok(Json(DataResponse { data: brief }))
}

/// POST /api/v1/briefs/{id}/complete
pub async fn complete(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Brief>>> {
    let brief = state.workflow.briefs.complete(id, brand.brand_id).await?;
    Ok(Json(DataResponse { data: brief }))
}
