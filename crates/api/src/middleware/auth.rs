//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use brieflink_core::error::CoreError;
use brieflink_core::roles::ActorRole;
use brieflink_core::types::DbId;
use brieflink_workflow::Party;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated actor extracted from a JWT Bearer token in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The actor id (from `claims.sub`).
    pub actor_id: DbId,
    pub role: ActorRole,
}

impl AuthUser {
    /// Resolve the caller's profile on their side of the marketplace.
    pub async fn party(&self, state: &AppState) -> AppResult<Party> {
        let party = match self.role {
            ActorRole::Brand => Party::Brand(state.workflow.brand_profile_id(self.actor_id).await?),
            ActorRole::Manufacturer => Party::Manufacturer(
                state
                    .workflow
                    .manufacturer_profile_id(self.actor_id)
                    .await?,
            ),
        };
        Ok(party)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role = ActorRole::parse(&claims.role).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Unknown role '{}'",
                claims.role
            )))
        })?;

        Ok(AuthUser {
            actor_id: claims.sub,
            role,
        })
    }
}
