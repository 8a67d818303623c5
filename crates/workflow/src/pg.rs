//! Postgres-backed [`RecordStore`] and [`ProfileDirectory`].

use async_trait::async_trait;
use brieflink_core::matching::Capability;
use brieflink_core::status::{BriefStatus, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::{Brief, BriefQuery, CreateBrief, UpdateBrief};
use brieflink_db::models::engagement_match::{EngagementMatch, UpsertMatch};
use brieflink_db::models::execution_log::{CreateLogEntry, ExecutionLogEntry};
use brieflink_db::models::notification::{CreateNotification, Notification};
use brieflink_db::models::profile::{BrandProfile, ManufacturerProfile};
use brieflink_db::models::proposal::{CreateProposal, Proposal};
use brieflink_db::repositories::proposal_repo::{ACTIVE_PAIR_INDEX, ONE_ACCEPTED_INDEX};
use brieflink_db::repositories::{
    BriefRepo, ExecutionLogRepo, MatchRepo, NotificationRepo, ProfileRepo, ProposalRepo,
};
use brieflink_db::DbPool;

use crate::store::{ProfileDirectory, ProposalInsert, RecordStore, StoreError};

/// [`RecordStore`] over the `brieflink-db` repositories.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(brieflink_db::health_check(&self.pool).await?)
    }

    async fn insert_brief(&self, input: CreateBrief) -> Result<Brief, StoreError> {
        Ok(BriefRepo::create(&self.pool, &input).await?)
    }

    async fn find_brief(&self, id: DbId) -> Result<Option<Brief>, StoreError> {
        Ok(BriefRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_brief(
        &self,
        id: DbId,
        input: &UpdateBrief,
        allowed: &[BriefStatus],
    ) -> Result<Option<Brief>, StoreError> {
        Ok(BriefRepo::update(&self.pool, id, input, allowed).await?)
    }

    async fn transition_brief(
        &self,
        id: DbId,
        from: &[BriefStatus],
        to: BriefStatus,
    ) -> Result<Option<Brief>, StoreError> {
        Ok(BriefRepo::transition_status(&self.pool, id, from, to).await?)
    }

    async fn soft_delete_brief(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(BriefRepo::soft_delete(&self.pool, id).await?)
    }

    async fn list_briefs_by_owner(
        &self,
        query: &BriefQuery,
    ) -> Result<(Vec<Brief>, i64), StoreError> {
        let items = BriefRepo::list_by_owner(&self.pool, query).await?;
        let total = BriefRepo::count_by_owner(&self.pool, query).await?;
        Ok((items, total))
    }

    async fn list_open_briefs(&self, limit: i64) -> Result<Vec<Brief>, StoreError> {
        Ok(BriefRepo::list_open_recent(&self.pool, limit).await?)
    }

    async fn find_briefs(&self, ids: &[DbId]) -> Result<Vec<Brief>, StoreError> {
        Ok(BriefRepo::find_many(&self.pool, ids).await?)
    }

    async fn insert_proposal(&self, input: CreateProposal) -> Result<ProposalInsert, StoreError> {
        match ProposalRepo::create_guarded(&self.pool, &input).await {
            Ok(Some(proposal)) => Ok(ProposalInsert::Inserted(proposal)),
            Ok(None) => Ok(ProposalInsert::BriefNotOpen),
            Err(e) if brieflink_db::is_unique_violation(&e, ACTIVE_PAIR_INDEX) => {
                Ok(ProposalInsert::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_proposal(&self, id: DbId) -> Result<Option<Proposal>, StoreError> {
        Ok(ProposalRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_active_proposal(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<Proposal>, StoreError> {
        Ok(ProposalRepo::find_active_for_pair(&self.pool, brief_id, manufacturer_profile_id).await?)
    }

    async fn list_proposals_for_brief(&self, brief_id: DbId) -> Result<Vec<Proposal>, StoreError> {
        Ok(ProposalRepo::list_for_brief(&self.pool, brief_id).await?)
    }

    async fn list_proposals_for_manufacturer(
        &self,
        manufacturer_profile_id: DbId,
    ) -> Result<Vec<Proposal>, StoreError> {
        Ok(ProposalRepo::list_for_manufacturer(&self.pool, manufacturer_profile_id).await?)
    }

    async fn list_proposals_in_status(
        &self,
        brief_id: DbId,
        statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError> {
        Ok(ProposalRepo::list_in_status_for_brief(&self.pool, brief_id, statuses, None).await?)
    }

    async fn transition_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError> {
        Ok(ProposalRepo::transition_status(&self.pool, id, from, to).await?)
    }

    async fn accept_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError> {
        match ProposalRepo::accept_guarded(&self.pool, id, from).await {
            Ok(accepted) => Ok(accepted),
            // A concurrent acceptance on the same brief committed first.
            Err(e) if brieflink_db::is_unique_violation(&e, ONE_ACCEPTED_INDEX) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn reject_pending_proposals(
        &self,
        brief_id: DbId,
        keep: DbId,
    ) -> Result<Vec<Proposal>, StoreError> {
        Ok(ProposalRepo::reject_pending_except(&self.pool, brief_id, keep).await?)
    }

    async fn upsert_match(&self, input: UpsertMatch) -> Result<EngagementMatch, StoreError> {
        Ok(MatchRepo::upsert(&self.pool, &input).await?)
    }

    async fn find_match(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<EngagementMatch>, StoreError> {
        Ok(MatchRepo::find_for_pair(&self.pool, brief_id, manufacturer_profile_id).await?)
    }

    async fn append_log_entry(
        &self,
        input: CreateLogEntry,
    ) -> Result<ExecutionLogEntry, StoreError> {
        Ok(ExecutionLogRepo::create(&self.pool, &input).await?)
    }

    async fn list_log_entries(&self, brief_id: DbId) -> Result<Vec<ExecutionLogEntry>, StoreError> {
        Ok(ExecutionLogRepo::list_for_brief(&self.pool, brief_id).await?)
    }

    async fn insert_notification(
        &self,
        input: CreateNotification,
    ) -> Result<Notification, StoreError> {
        Ok(NotificationRepo::create(&self.pool, &input).await?)
    }

    async fn list_notifications(
        &self,
        recipient_actor_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        Ok(NotificationRepo::list_for_recipient(
            &self.pool,
            recipient_actor_id,
            unread_only,
            limit,
            offset,
        )
        .await?)
    }

    async fn mark_notification_read(
        &self,
        recipient_actor_id: DbId,
        id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        Ok(NotificationRepo::mark_read(&self.pool, id, recipient_actor_id).await?)
    }

    async fn mark_all_notifications_read(
        &self,
        recipient_actor_id: DbId,
    ) -> Result<u64, StoreError> {
        Ok(NotificationRepo::mark_all_read(&self.pool, recipient_actor_id).await?)
    }

    async fn unread_notification_count(&self, recipient_actor_id: DbId) -> Result<i64, StoreError> {
        Ok(NotificationRepo::unread_count(&self.pool, recipient_actor_id).await?)
    }
}

/// [`ProfileDirectory`] reading the onboarding tables directly.
#[derive(Clone)]
pub struct PgProfileDirectory {
    pool: DbPool,
}

impl PgProfileDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
    async fn brand_for_actor(&self, actor_id: DbId) -> Result<Option<BrandProfile>, StoreError> {
        Ok(ProfileRepo::brand_by_actor(&self.pool, actor_id).await?)
    }

    async fn brand(&self, id: DbId) -> Result<Option<BrandProfile>, StoreError> {
        Ok(ProfileRepo::brand_by_id(&self.pool, id).await?)
    }

    async fn manufacturer_for_actor(
        &self,
        actor_id: DbId,
    ) -> Result<Option<ManufacturerProfile>, StoreError> {
        Ok(ProfileRepo::manufacturer_by_actor(&self.pool, actor_id).await?)
    }

    async fn manufacturer(&self, id: DbId) -> Result<Option<ManufacturerProfile>, StoreError> {
        Ok(ProfileRepo::manufacturer_by_id(&self.pool, id).await?)
    }

    async fn manufacturers(&self, ids: &[DbId]) -> Result<Vec<ManufacturerProfile>, StoreError> {
        Ok(ProfileRepo::manufacturers_by_ids(&self.pool, ids).await?)
    }

    async fn capabilities(&self, manufacturer_id: DbId) -> Result<Vec<Capability>, StoreError> {
        let rows = ProfileRepo::capabilities(&self.pool, manufacturer_id).await?;
        Ok(rows.into_iter().map(Capability::from).collect())
    }

    async fn verified_manufacturers(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ManufacturerProfile>, StoreError> {
        Ok(ProfileRepo::list_verified_manufacturers(&self.pool, category).await?)
    }
}
