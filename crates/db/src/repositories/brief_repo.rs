//! Repository for the `briefs` table.

use brieflink_core::status::{BriefStatus, StatusId};
use brieflink_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::brief::{Brief, BriefQuery, CreateBrief, UpdateBrief};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, brand_profile_id, title, description, requirements, \
    budget_min, budget_max, currency, category, timeline, status_id, ai_generated, \
    deleted_at, created_at, updated_at";

fn status_ids(statuses: &[BriefStatus]) -> Vec<StatusId> {
    statuses.iter().map(|s| s.id()).collect()
}

/// Provides persistence operations for briefs.
pub struct BriefRepo;

impl BriefRepo {
    /// Insert a new brief in `DRAFT`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBrief) -> Result<Brief, sqlx::Error> {
        let f = &input.fields;
        let query = format!(
            "INSERT INTO briefs
                (brand_profile_id, title, description, requirements, budget_min, budget_max,
                 currency, category, timeline, status_id, ai_generated)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(input.brand_profile_id)
            .bind(&f.title)
            .bind(&f.description)
            .bind(Json(&f.requirements))
            .bind(f.budget.min)
            .bind(f.budget.max)
            .bind(&f.currency)
            .bind(&f.category)
            .bind(&f.timeline)
            .bind(BriefStatus::Draft.id())
            .bind(f.ai_generated)
            .fetch_one(pool)
            .await
    }

    /// Find a brief by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brief>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM briefs WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Brief>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`, provided the brief is still in
    /// one of `allowed`.
    ///
    /// Returns `None` if the row is missing, deleted, or has moved on.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBrief,
        allowed: &[BriefStatus],
    ) -> Result<Option<Brief>, sqlx::Error> {
        let query = format!(
            "UPDATE briefs SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                requirements = COALESCE($4, requirements),
                budget_min = COALESCE($5, budget_min),
                budget_max = COALESCE($6, budget_max),
                currency = COALESCE($7, currency),
                category = COALESCE($8, category),
                timeline = COALESCE($9, timeline)
             WHERE id = $1 AND deleted_at IS NULL AND status_id = ANY($10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.requirements.as_ref().map(Json))
            .bind(input.budget.map(|b| b.min))
            .bind(input.budget.map(|b| b.max))
            .bind(&input.currency)
            .bind(&input.category)
            .bind(&input.timeline)
            .bind(status_ids(allowed))
            .fetch_optional(pool)
            .await
    }

    /// Move a brief to `to` only if its current status is one of `from`.
    ///
    /// Returns `None` when the predicate did not hold (or the row is gone),
    /// leaving the row untouched.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from: &[BriefStatus],
        to: BriefStatus,
    ) -> Result<Option<Brief>, sqlx::Error> {
        let query = format!(
            "UPDATE briefs SET status_id = $3
             WHERE id = $1 AND deleted_at IS NULL AND status_id = ANY($2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(id)
            .bind(status_ids(from))
            .bind(to.id())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a brief by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE briefs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of an owner's briefs.
    ///
    /// Sort column and direction come from closed enums, never request text.
    pub async fn list_by_owner(pool: &PgPool, q: &BriefQuery) -> Result<Vec<Brief>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM briefs
             WHERE brand_profile_id = $1 AND deleted_at IS NULL
               AND ($2::SMALLINT IS NULL OR status_id = $2)
               AND ($3::TEXT IS NULL OR lower(btrim(category)) = lower(btrim($3)))
             ORDER BY {col} {dir}, id {dir}
             LIMIT $4 OFFSET $5",
            col = q.sort.column(),
            dir = q.direction.keyword(),
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(q.brand_profile_id)
            .bind(q.status.map(BriefStatus::id))
            .bind(&q.category)
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(pool)
            .await
    }

    /// Total rows matching the same filters as [`Self::list_by_owner`].
    pub async fn count_by_owner(pool: &PgPool, q: &BriefQuery) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM briefs
             WHERE brand_profile_id = $1 AND deleted_at IS NULL
               AND ($2::SMALLINT IS NULL OR status_id = $2)
               AND ($3::TEXT IS NULL OR lower(btrim(category)) = lower(btrim($3)))",
        )
        .bind(q.brand_profile_id)
        .bind(q.status.map(BriefStatus::id))
        .bind(&q.category)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// The `limit` most recently created open briefs.
    pub async fn list_open_recent(pool: &PgPool, limit: i64) -> Result<Vec<Brief>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM briefs
             WHERE status_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Brief>(&query)
            .bind(BriefStatus::Open.id())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Briefs by ID, in no particular order. Includes soft-deleted rows so
    /// a manufacturer's history stays readable.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Brief>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM briefs WHERE id = ANY($1)");
        sqlx::query_as::<_, Brief>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
