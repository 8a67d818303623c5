//! Persistence and profile-lookup seams used by every workflow service.

use async_trait::async_trait;
use brieflink_core::error::CoreError;
use brieflink_core::matching::Capability;
use brieflink_core::status::{BriefStatus, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::{Brief, BriefQuery, CreateBrief, UpdateBrief};
use brieflink_db::models::engagement_match::{EngagementMatch, UpsertMatch};
use brieflink_db::models::execution_log::{CreateLogEntry, ExecutionLogEntry};
use brieflink_db::models::notification::{CreateNotification, Notification};
use brieflink_db::models::profile::{BrandProfile, ManufacturerProfile};
use brieflink_db::models::proposal::{CreateProposal, Proposal};

/// A failure inside a store or directory implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Internal(err.to_string())
    }
}

/// Outcome of a guarded proposal insert.
#[derive(Debug)]
pub enum ProposalInsert {
    Inserted(Proposal),
    /// The brief was missing, deleted or not `OPEN` at insert time.
    BriefNotOpen,
    /// An active proposal for the pair already exists.
    Duplicate,
}

/// Typed access to engagement records.
///
/// Conditional writes (`transition_*`, `accept_proposal`, `update_brief`)
/// return `None` when their predicate no longer holds; they never partially
/// apply.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cheap reachability check for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    // -- briefs --
    async fn insert_brief(&self, input: CreateBrief) -> Result<Brief, StoreError>;
    async fn find_brief(&self, id: DbId) -> Result<Option<Brief>, StoreError>;
    async fn update_brief(
        &self,
        id: DbId,
        input: &UpdateBrief,
        allowed: &[BriefStatus],
    ) -> Result<Option<Brief>, StoreError>;
    async fn transition_brief(
        &self,
        id: DbId,
        from: &[BriefStatus],
        to: BriefStatus,
    ) -> Result<Option<Brief>, StoreError>;
    async fn soft_delete_brief(&self, id: DbId) -> Result<bool, StoreError>;
    /// One page of the owner's briefs plus the unpaged total.
    async fn list_briefs_by_owner(&self, query: &BriefQuery)
        -> Result<(Vec<Brief>, i64), StoreError>;
    /// Most recent open briefs, newest first.
    async fn list_open_briefs(&self, limit: i64) -> Result<Vec<Brief>, StoreError>;
    /// Briefs by ID including soft-deleted ones.
    async fn find_briefs(&self, ids: &[DbId]) -> Result<Vec<Brief>, StoreError>;

    // -- proposals --
    async fn insert_proposal(&self, input: CreateProposal) -> Result<ProposalInsert, StoreError>;
    async fn find_proposal(&self, id: DbId) -> Result<Option<Proposal>, StoreError>;
    async fn find_active_proposal(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<Proposal>, StoreError>;
    async fn list_proposals_for_brief(&self, brief_id: DbId) -> Result<Vec<Proposal>, StoreError>;
    async fn list_proposals_for_manufacturer(
        &self,
        manufacturer_profile_id: DbId,
    ) -> Result<Vec<Proposal>, StoreError>;
    async fn list_proposals_in_status(
        &self,
        brief_id: DbId,
        statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError>;
    async fn transition_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError>;
    /// Move a proposal from `from` to `ACCEPTED`, but only while its brief is
    /// `OPEN` or `MATCHED` and no other proposal on the brief is accepted.
    async fn accept_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError>;
    /// Reject every `SUBMITTED` / `UNDER_REVIEW` proposal on the brief other
    /// than `keep`, returning the rows that changed.
    async fn reject_pending_proposals(
        &self,
        brief_id: DbId,
        keep: DbId,
    ) -> Result<Vec<Proposal>, StoreError>;

    // -- matches --
    async fn upsert_match(&self, input: UpsertMatch) -> Result<EngagementMatch, StoreError>;
    async fn find_match(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<EngagementMatch>, StoreError>;

    // -- execution log --
    async fn append_log_entry(&self, input: CreateLogEntry)
        -> Result<ExecutionLogEntry, StoreError>;
    async fn list_log_entries(&self, brief_id: DbId) -> Result<Vec<ExecutionLogEntry>, StoreError>;

    // -- notifications --
    async fn insert_notification(
        &self,
        input: CreateNotification,
    ) -> Result<Notification, StoreError>;
    async fn list_notifications(
        &self,
        recipient_actor_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError>;
    async fn mark_notification_read(
        &self,
        recipient_actor_id: DbId,
        id: DbId,
    ) -> Result<Option<Notification>, StoreError>;
    async fn mark_all_notifications_read(&self, recipient_actor_id: DbId)
        -> Result<u64, StoreError>;
    async fn unread_notification_count(&self, recipient_actor_id: DbId) -> Result<i64, StoreError>;
}

/// Read-only view of brand and manufacturer profiles.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn brand_for_actor(&self, actor_id: DbId) -> Result<Option<BrandProfile>, StoreError>;
    async fn brand(&self, id: DbId) -> Result<Option<BrandProfile>, StoreError>;
    async fn manufacturer_for_actor(
        &self,
        actor_id: DbId,
    ) -> Result<Option<ManufacturerProfile>, StoreError>;
    async fn manufacturer(&self, id: DbId) -> Result<Option<ManufacturerProfile>, StoreError>;
    /// Manufacturers by ID, ordered by ID.
    async fn manufacturers(&self, ids: &[DbId]) -> Result<Vec<ManufacturerProfile>, StoreError>;
    async fn capabilities(&self, manufacturer_id: DbId) -> Result<Vec<Capability>, StoreError>;
    /// Verified manufacturers ordered by ID, restricted to `category` when given.
    async fn verified_manufacturers(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ManufacturerProfile>, StoreError>;
}
