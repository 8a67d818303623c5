//! Repository for the append-only `execution_log_entries` table.

use brieflink_core::types::DbId;
use sqlx::PgPool;

use crate::models::execution_log::{CreateLogEntry, ExecutionLogEntry};

const COLUMNS: &str = "id, brief_id, author_actor_id, entry_type, content, created_at";

pub struct ExecutionLogRepo;

impl ExecutionLogRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateLogEntry,
    ) -> Result<ExecutionLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO execution_log_entries (brief_id, author_actor_id, entry_type, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExecutionLogEntry>(&query)
            .bind(input.brief_id)
            .bind(input.author_actor_id)
            .bind(input.entry_type.as_str())
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Entries for a brief, oldest first.
    pub async fn list_for_brief(
        pool: &PgPool,
        brief_id: DbId,
    ) -> Result<Vec<ExecutionLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM execution_log_entries
             WHERE brief_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ExecutionLogEntry>(&query)
            .bind(brief_id)
            .fetch_all(pool)
            .await
    }
}
