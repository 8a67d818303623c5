//! Role extractors.
//!
//! Each wraps [`AuthUser`], rejects the wrong side of the marketplace with
//! 403, and resolves the caller's profile id through the profile directory.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use brieflink_core::error::CoreError;
use brieflink_core::roles::ActorRole;
use brieflink_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A brand actor and the brand profile it owns.
#[derive(Debug, Clone)]
pub struct BrandCaller {
    pub actor_id: DbId,
    pub brand_id: DbId,
}

/// Requires the `brand` role.
///
/// ```ignore
/// async fn handler(RequireBrand(brand): RequireBrand) -> AppResult<Json<()>> {
///     tracing::info!(brand_id = brand.brand_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
pub struct RequireBrand(pub BrandCaller);

impl FromRequestParts<AppState> for RequireBrand {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ActorRole::Brand {
            return Err(AppError::Core(CoreError::Forbidden(
                "Brand role required".into(),
            )));
        }
        let brand_id = state.workflow.brand_profile_id(user.actor_id).await?;
        Ok(RequireBrand(BrandCaller {
            actor_id: user.actor_id,
            brand_id,
        }))
    }
}

/// A manufacturer actor and its manufacturer profile.
#[derive(Debug, Clone)]
pub struct ManufacturerCaller {
    pub actor_id: DbId,
    pub manufacturer_id: DbId,
}

/// Requires the `manufacturer` role.
pub struct RequireManufacturer(pub ManufacturerCaller);

impl FromRequestParts<AppState> for RequireManufacturer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ActorRole::Manufacturer {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manufacturer role required".into(),
            )));
        }
        let manufacturer_id = state
            .workflow
            .manufacturer_profile_id(user.actor_id)
            .await?;
        Ok(RequireManufacturer(ManufacturerCaller {
            actor_id: user.actor_id,
            manufacturer_id,
        }))
    }
}
