//! Repository for the `engagement_matches` table.

use brieflink_core::types::DbId;
use sqlx::PgPool;

use crate::models::engagement_match::{EngagementMatch, UpsertMatch};

const COLUMNS: &str =
    "id, brief_id, manufacturer_profile_id, match_type, score, created_at, updated_at";

pub struct MatchRepo;

impl MatchRepo {
    /// Insert or refresh the match for a (brief, manufacturer) pair.
    ///
    /// Re-running for the same pair updates the existing row, so there is
    /// never more than one.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertMatch,
    ) -> Result<EngagementMatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO engagement_matches (brief_id, manufacturer_profile_id, match_type, score)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_engagement_matches_pair
             DO UPDATE SET match_type = EXCLUDED.match_type, score = EXCLUDED.score
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EngagementMatch>(&query)
            .bind(input.brief_id)
            .bind(input.manufacturer_profile_id)
            .bind(input.match_type.as_str())
            .bind(input.score)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_pair(
        pool: &PgPool,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<EngagementMatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM engagement_matches
             WHERE brief_id = $1 AND manufacturer_profile_id = $2"
        );
        sqlx::query_as::<_, EngagementMatch>(&query)
            .bind(brief_id)
            .bind(manufacturer_profile_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_brief(
        pool: &PgPool,
        brief_id: DbId,
    ) -> Result<Vec<EngagementMatch>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM engagement_matches WHERE brief_id = $1 ORDER BY id");
        sqlx::query_as::<_, EngagementMatch>(&query)
            .bind(brief_id)
            .fetch_all(pool)
            .await
    }
}
