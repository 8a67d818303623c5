//! Execution log: the running record of a project once a proposal is accepted.
//!
//! Entries may be written and read by the brand that owns the brief and by
//! the manufacturer whose proposal was accepted. Nobody else sees them.

use std::sync::Arc;

use brieflink_core::error::CoreError;
use brieflink_core::execution_log::{EntryType, NewLogEntry};
use brieflink_core::status::{BriefStatus, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;
use brieflink_db::models::execution_log::{CreateLogEntry, ExecutionLogEntry};
use validator::Validate;

use crate::store::{ProfileDirectory, RecordStore};

#[derive(Clone)]
pub struct ExecutionLog {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn ProfileDirectory>,
}

impl ExecutionLog {
    pub fn new(store: Arc<dyn RecordStore>, directory: Arc<dyn ProfileDirectory>) -> Self {
        Self { store, directory }
    }

    /// Write a system milestone without party or status checks.
    pub(crate) async fn record_milestone(
        &self,
        brief_id: DbId,
        author_actor_id: DbId,
        content: String,
    ) -> Result<ExecutionLogEntry, CoreError> {
        let entry = self
            .store
            .append_log_entry(CreateLogEntry {
                brief_id,
                author_actor_id,
                entry_type: EntryType::Milestone,
                content,
            })
            .await?;
        Ok(entry)
    }

    /// Append an entry on behalf of one of the engaged parties.
    pub async fn append(
        &self,
        brief_id: DbId,
        author_actor_id: DbId,
        entry: NewLogEntry,
    ) -> Result<ExecutionLogEntry, CoreError> {
        entry.validate()?;
        let brief = self.load_brief(brief_id).await?;
        self.authorize(&brief, author_actor_id).await?;
        if brief.status != BriefStatus::InProgress {
            return Err(CoreError::BadRequest(format!(
                "Execution log entries need an IN_PROGRESS brief (brief is {})",
                brief.status
            )));
        }

        let created = self
            .store
            .append_log_entry(CreateLogEntry {
                brief_id,
                author_actor_id,
                entry_type: entry.entry_type,
                content: entry.content,
            })
            .await?;

        tracing::info!(
            entry_id = created.id,
            brief_id,
            author_actor_id,
            entry_type = entry.entry_type.as_str(),
            "Execution log entry added"
        );
        Ok(created)
    }

    /// Entries for a brief, oldest first.
    pub async fn list_for_brief(
        &self,
        brief_id: DbId,
        caller_actor_id: DbId,
    ) -> Result<Vec<ExecutionLogEntry>, CoreError> {
        let brief = self.load_brief(brief_id).await?;
        self.authorize(&brief, caller_actor_id).await?;
        Ok(self.store.list_log_entries(brief_id).await?)
    }

    async fn load_brief(&self, brief_id: DbId) -> Result<Brief, CoreError> {
        self.store
            .find_brief(brief_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Brief",
                id: brief_id,
            })
    }

    async fn authorize(&self, brief: &Brief, actor_id: DbId) -> Result<(), CoreError> {
        let owner = self.directory.brand(brief.brand_profile_id).await?;
        if owner.is_some_and(|b| b.actor_id == actor_id) {
            return Ok(());
        }

        let accepted = self
            .store
            .list_proposals_in_status(brief.id, &[ProposalStatus::Accepted])
            .await?;
        for proposal in accepted {
            let manufacturer = self
                .directory
                .manufacturer(proposal.manufacturer_profile_id)
                .await?;
            if manufacturer.is_some_and(|m| m.actor_id == actor_id) {
                return Ok(());
            }
        }

        Err(CoreError::Forbidden(
            "Only the brand and the selected manufacturer can access this execution log".into(),
        ))
    }
}
