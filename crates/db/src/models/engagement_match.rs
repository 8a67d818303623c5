//! Brief/manufacturer match model.

use brieflink_core::matching::MatchType;
use brieflink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `engagement_matches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EngagementMatch {
    pub id: DbId,
    pub brief_id: DbId,
    pub manufacturer_profile_id: DbId,
    pub match_type: String,
    pub score: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the (brief, manufacturer) upsert.
#[derive(Debug, Clone)]
pub struct UpsertMatch {
    pub brief_id: DbId,
    pub manufacturer_profile_id: DbId,
    pub match_type: MatchType,
    pub score: i32,
}
