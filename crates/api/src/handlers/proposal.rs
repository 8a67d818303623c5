//! Handlers for proposals, both brief-scoped and by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use brieflink_core::proposal::ProposalTerms;
use brieflink_core::status::ProposalStatus;
use brieflink_core::types::DbId;
use brieflink_db::models::proposal::Proposal;
use brieflink_workflow::proposals::StatusChange;
use brieflink_workflow::views::{ProposalWithBrief, ProposalWithManufacturer};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireBrand, RequireManufacturer};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PATCH /proposals/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ProposalStatus,
}

/// POST /api/v1/briefs/{id}/proposals
pub async fn create(
    RequireManufacturer(manufacturer): RequireManufacturer,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
    Json(terms): Json<ProposalTerms>,
) -> AppResult<(StatusCode, Json<DataResponse<Proposal>>)> {
    let proposal = state
        .workflow
        .proposals
        .create(manufacturer.manufacturer_id, brief_id, terms)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: proposal })))
}

/// GET /api/v1/briefs/{id}/proposals
pub async fn list_for_brief(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(brief_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProposalWithManufacturer>>>> {
    let proposals = state
        .workflow
        .proposals
        .list_for_brief(brief_id, brand.brand_id)
        .await?;
    Ok(Json(DataResponse { data: proposals }))
}

/// GET /api/v1/proposals/mine
pub async fn list_mine(
    RequireManufacturer(manufacturer): RequireManufacturer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProposalWithBrief>>>> {
    let proposals = state
        .workflow
        .proposals
        .list_mine(manufacturer.manufacturer_id)
        .await?;
    Ok(Json(DataResponse { data: proposals }))
}

/// GET /api/v1/proposals/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Proposal>>> {
    let party = auth.party(&state).await?;
    let proposal = state.workflow.proposals.get(id, party).await?;
    Ok(Json(DataResponse { data: proposal }))
}

/// PATCH /api/v1/proposals/{id}/status
///
/// Accepting or rejecting returns the cascade report next to the proposal.
pub async fn update_status(
    RequireBrand(brand): RequireBrand,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<Json<DataResponse<StatusChange>>> {
    let change = state
        .workflow
        .proposals
        .update_status(id, brand.brand_id, input.status)
        .await?;
    Ok(Json(DataResponse { data: change }))
}

/// POST /api/v1/proposals/{id}/withdraw
pub async fn withdraw(
    RequireManufacturer(manufacturer): RequireManufacturer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Proposal>>> {
    let proposal = state
        .workflow
        .proposals
        .withdraw(id, manufacturer.manufacturer_id)
        .await?;
    Ok(Json(DataResponse { data: proposal }))
}
