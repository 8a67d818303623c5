//! Brief lifecycle: DRAFT -> OPEN -> IN_PROGRESS -> COMPLETED, with
//! CANCELLED reachable from any non-terminal state.
//!
//! IN_PROGRESS is only entered through proposal acceptance.

use std::sync::Arc;

use brieflink_core::brief::{BriefFields, BriefListFilter, BriefPatch};
use brieflink_core::error::CoreError;
use brieflink_core::execution_log::project_completed_message;
use brieflink_core::notification::brief_cancelled;
use brieflink_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use brieflink_core::status::{BriefStatus, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::{Brief, BriefQuery, CreateBrief, UpdateBrief};
use validator::Validate;

use crate::execution_log::ExecutionLog;
use crate::notifier::NotificationEmitter;
use crate::store::{ProfileDirectory, RecordStore};
use crate::views::BriefPage;

/// Statuses a brief can still be edited or cancelled from.
const LIVE_STATUSES: [BriefStatus; 4] = [
    BriefStatus::Draft,
    BriefStatus::Open,
    BriefStatus::Matched,
    BriefStatus::InProgress,
];

#[derive(Clone)]
pub struct BriefLifecycle {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn ProfileDirectory>,
    notifications: NotificationEmitter,
    execution_log: ExecutionLog,
}

impl BriefLifecycle {
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn ProfileDirectory>,
        notifications: NotificationEmitter,
        execution_log: ExecutionLog,
    ) -> Self {
        Self {
            store,
            directory,
            notifications,
            execution_log,
        }
    }

    /// Validate and store a new brief in `DRAFT`.
    pub async fn create(&self, owner: DbId, fields: BriefFields) -> Result<Brief, CoreError> {
        fields.validate()?;
        let brief = self
            .store
            .insert_brief(CreateBrief {
                brand_profile_id: owner,
                fields,
            })
            .await?;
        tracing::info!(brief_id = brief.id, brand_profile_id = owner, "Brief created");
        Ok(brief)
    }

    /// A non-deleted brief by ID.
    pub async fn get(&self, id: DbId) -> Result<Brief, CoreError> {
        self.store
            .find_brief(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Brief", id })
    }

    async fn get_owned(&self, id: DbId, owner: DbId) -> Result<Brief, CoreError> {
        let brief = self.get(id).await?;
        if brief.brand_profile_id != owner {
            return Err(CoreError::Forbidden("You do not own this brief".into()));
        }
        Ok(brief)
    }

    /// Merge `patch` into the brief and re-validate the whole field set.
    ///
    /// Status is never changed here.
    pub async fn update(
        &self,
        id: DbId,
        owner: DbId,
        patch: BriefPatch,
    ) -> Result<Brief, CoreError> {
        let brief = self.get_owned(id, owner).await?;
        if brief.status.is_terminal() {
            return Err(CoreError::BadRequest(format!(
                "Brief is {} and can no longer be edited",
                brief.status
            )));
        }
        if patch.is_empty() {
            return Ok(brief);
        }

        patch.clone().apply_to(brief.fields()).validate()?;

        let updated = self
            .store
            .update_brief(id, &UpdateBrief::from(patch), &LIVE_STATUSES)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict("Brief was closed while it was being edited".into())
            })?;
        tracing::info!(brief_id = id, "Brief updated");
        Ok(updated)
    }

    /// DRAFT -> OPEN. Any other starting status is a `BadRequest`.
    pub async fn publish(&self, id: DbId, owner: DbId) -> Result<Brief, CoreError> {
        let brief = self.get_owned(id, owner).await?;
        let not_draft = |status: BriefStatus| {
            CoreError::BadRequest(format!(
                "Only DRAFT briefs can be published (brief is {status})"
            ))
        };
        if brief.status != BriefStatus::Draft {
            return Err(not_draft(brief.status));
        }

        let published = match self
            .store
            .transition_brief(id, &[BriefStatus::Draft], BriefStatus::Open)
            .await?
        {
            Some(b) => b,
            // Someone else moved it between the read and the write.
            None => return Err(not_draft(self.get(id).await?.status)),
        };
        tracing::info!(brief_id = id, "Brief published");
        Ok(published)
    }

    /// Soft delete. The brief disappears from every later query.
    pub async fn delete(&self, id: DbId, owner: DbId) -> Result<(), CoreError> {
        self.get_owned(id, owner).await?;
        if !self.store.soft_delete_brief(id).await? {
            return Err(CoreError::NotFound { entity: "Brief", id });
        }
        tracing::info!(brief_id = id, "Brief deleted");
        Ok(())
    }

    pub async fn list_by_owner(
        &self,
        owner: DbId,
        filter: BriefListFilter,
    ) -> Result<BriefPage, CoreError> {
        let query = BriefQuery {
            brand_profile_id: owner,
            status: filter.status,
            category: filter
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            sort: filter.sort,
            direction: filter.direction,
            limit: clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
            offset: clamp_offset(filter.offset),
        };
        let (items, total) = self.store.list_briefs_by_owner(&query).await?;
        Ok(BriefPage {
            items,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }

    /// Any non-terminal status -> CANCELLED.
    ///
    /// Manufacturers with a live proposal on the brief are told.
    pub async fn cancel(&self, id: DbId, owner: DbId) -> Result<Brief, CoreError> {
        let brief = self.get_owned(id, owner).await?;
        if brief.status.is_terminal() {
            return Err(CoreError::BadRequest(format!(
                "Brief is already {}",
                brief.status
            )));
        }

        let cancelled = self
            .store
            .transition_brief(id, &LIVE_STATUSES, BriefStatus::Cancelled)
            .await?
            .ok_or_else(|| CoreError::BadRequest("Brief is already closed".into()))?;
        tracing::info!(brief_id = id, "Brief cancelled");

        if let Err(e) = self.notify_cancellation(&cancelled).await {
            tracing::warn!(brief_id = id, error = %e, "Cancellation notices not sent");
        }
        Ok(cancelled)
    }

    async fn notify_cancellation(&self, brief: &Brief) -> Result<(), CoreError> {
        let affected = self
            .store
            .list_proposals_in_status(
                brief.id,
                &[
                    ProposalStatus::Submitted,
                    ProposalStatus::UnderReview,
                    ProposalStatus::Accepted,
                ],
            )
            .await?;
        let ids: Vec<DbId> = affected.iter().map(|p| p.manufacturer_profile_id).collect();
        for manufacturer in self.directory.manufacturers(&ids).await? {
            self.notifications
                .emit(manufacturer.actor_id, brief_cancelled(brief.id, &brief.title))
                .await;
        }
        Ok(())
    }

    /// IN_PROGRESS -> COMPLETED, closing the execution log with a milestone.
    pub async fn complete(&self, id: DbId, owner: DbId) -> Result<Brief, CoreError> {
        let brief = self.get_owned(id, owner).await?;
        if brief.status != BriefStatus::InProgress {
            return Err(CoreError::BadRequest(format!(
                "Only IN_PROGRESS briefs can be completed (brief is {})",
                brief.status
            )));
        }

        let completed = self
            .store
            .transition_brief(id, &[BriefStatus::InProgress], BriefStatus::Completed)
            .await?
            .ok_or_else(|| CoreError::BadRequest("Brief is no longer IN_PROGRESS".into()))?;
        tracing::info!(brief_id = id, "Brief completed");

        if let Err(e) = self.log_completion(&completed).await {
            tracing::warn!(brief_id = id, error = %e, "Completion milestone not recorded");
        }
        Ok(completed)
    }

    async fn log_completion(&self, brief: &Brief) -> Result<(), CoreError> {
        let brand = self
            .directory
            .brand(brief.brand_profile_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "BrandProfile",
                id: brief.brand_profile_id,
            })?;
        self.execution_log
            .record_milestone(brief.id, brand.actor_id, project_completed_message(&brief.title))
            .await?;
        Ok(())
    }
}
