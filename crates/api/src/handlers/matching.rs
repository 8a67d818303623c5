//! Recommendation handlers for both sides of the marketplace.

use axum::extract::{Path, State};
use axum::Json;
use brieflink_core::error::CoreError;
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;
use brieflink_workflow::views::{ManufacturerSnapshot, Recommendation};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireBrand, RequireManufacturer};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/briefs/{id}/recommendations
///
/// Only the brief's owner may ask.
pub async fn for_brief(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Recommendation<ManufacturerSnapshot>>>>> {
    let brief = state.workflow.briefs.get(brief_id).await?;
    if brief.brand_profile_id != brand.brand_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this brief".into(),
        )));
    }
    let recommendations = state
        .workflow
        .matching
        .recommend_manufacturers_for(brief_id)
        .await?;
    Ok(Json(DataResponse {
        data: recommendations,
    }))
}

/// GET /api/v1/manufacturers/me/recommendations
pub async fn for_manufacturer(
    RequireManufacturer(manufacturer): RequireManufacturer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Recommendation<Brief>>>>> {
    let recommendations = state
        .workflow
        .matching
        .recommend_briefs_for(manufacturer.manufacturer_id)
        .await?;
    Ok(Json(DataResponse {
        data: recommendations,
    }))
}
