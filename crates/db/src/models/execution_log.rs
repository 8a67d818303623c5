//! Execution log entry model.

use brieflink_core::execution_log::EntryType;
use brieflink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `execution_log_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExecutionLogEntry {
    pub id: DbId,
    pub brief_id: DbId,
    pub author_actor_id: DbId,
    pub entry_type: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateLogEntry {
    pub brief_id: DbId,
    pub author_actor_id: DbId,
    pub entry_type: EntryType,
    pub content: String,
}
