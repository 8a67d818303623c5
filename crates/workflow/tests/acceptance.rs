//! Acceptance cascade, including the end-to-end engagement scenario.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use brieflink_core::error::CoreError;
use brieflink_core::matching::MatchType;
use brieflink_core::status::{BriefStatus, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::{Brief, BriefQuery, CreateBrief, UpdateBrief};
use brieflink_db::models::engagement_match::{EngagementMatch, UpsertMatch};
use brieflink_db::models::execution_log::{CreateLogEntry, ExecutionLogEntry};
use brieflink_db::models::notification::{CreateNotification, Notification};
use brieflink_db::models::proposal::{CreateProposal, Proposal};
use brieflink_workflow::memory::{InMemoryStore, StoreOp};
use brieflink_workflow::store::ProposalInsert;
use brieflink_workflow::{
    CascadeStep, ProfileDirectory, RecordStore, StoreError, Workflow, WorkflowConfig,
};
use common::*;
use tokio::sync::Barrier;

#[tokio::test]
async fn end_to_end_engagement() {
    let h = Harness::new();
    let mut events = h.bus.subscribe();

    // Draft, then publish.
    let b1 = h.draft_brief().await;
    assert_eq!(b1.status, BriefStatus::Draft);
    assert_eq!(b1.budget_min, 1000.0);
    let b1 = h.workflow.briefs.publish(b1.id, h.brand.id).await.unwrap();
    assert_eq!(b1.status, BriefStatus::Open);

    // Recommendations before any proposal: verified Apparel makers only.
    let recs = h
        .workflow
        .matching
        .recommend_manufacturers_for(b1.id)
        .await
        .unwrap();
    assert_eq!(
        recs.iter().map(|r| r.candidate.id).collect::<Vec<_>>(),
        vec![h.m1.id, h.m2.id]
    );
    assert!(recs.iter().all(|r| r.score == 100 && r.reason.contains("Apparel")));

    // M1 submits.
    let p1 = h
        .workflow
        .proposals
        .create(h.m1.id, b1.id, terms(2000.0))
        .await
        .unwrap();
    assert_eq!(p1.status, ProposalStatus::Submitted);
    let received = events.recv().await.unwrap();
    assert_eq!(received.event_type, "proposal.received");
    assert_eq!(received.recipient_actor_id, BRAND_ACTOR);
    assert_eq!(received.payload["brief_id"], b1.id);

    // Brand accepts.
    let change = h
        .workflow
        .proposals
        .update_status(p1.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(change.proposal.status, ProposalStatus::Accepted);
    assert!(change.cascade.as_ref().unwrap().is_clean());

    assert_eq!(
        h.workflow.briefs.get(b1.id).await.unwrap().status,
        BriefStatus::InProgress
    );
    let m = h.store.find_match(b1.id, h.m1.id).await.unwrap().unwrap();
    assert_eq!(m.score, 100);
    assert_eq!(m.match_type, MatchType::ManualSelection.as_str());

    let log = h.store.list_log_entries(b1.id).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].entry_type, "MILESTONE");
    assert_eq!(log[0].author_actor_id, BRAND_ACTOR);
    assert!(log[0].content.contains("Northside Mills"));

    let accepted = events.recv().await.unwrap();
    assert_eq!(accepted.event_type, "proposal.accepted");
    assert_eq!(accepted.recipient_actor_id, M1_ACTOR);
    assert_eq!(accepted.payload["proposal_id"], p1.id);

    // Late submission is refused.
    let err = h
        .workflow
        .proposals
        .create(h.m2.id, b1.id, terms(1500.0))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::BadRequest(msg) if msg.contains("not accepting proposals"));
}

#[tokio::test]
async fn notification_failure_leaves_the_acceptance_in_place() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();

    h.store.fail_on(StoreOp::InsertNotification);
    let change = h
        .workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();

    assert_eq!(change.proposal.status, ProposalStatus::Accepted);
    assert_eq!(
        change.cascade.unwrap().failed_steps,
        vec![CascadeStep::NotifyManufacturer]
    );
    assert_eq!(
        h.workflow.briefs.get(brief.id).await.unwrap().status,
        BriefStatus::InProgress
    );
    assert_eq!(h.store.matches().len(), 1);
}

#[tokio::test]
async fn every_cascade_step_is_independent() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();

    h.store.fail_on(StoreOp::TransitionBrief);
    h.store.fail_on(StoreOp::UpsertMatch);
    h.store.fail_on(StoreOp::AppendLogEntry);
    let change = h
        .workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();

    let report = change.cascade.unwrap();
    assert_eq!(
        report.failed_steps,
        vec![
            CascadeStep::BriefInProgress,
            CascadeStep::MatchRecord,
            CascadeStep::ExecutionLog,
        ]
    );
    // The manufacturer still hears about it.
    let last = h.store.notifications().pop().unwrap();
    assert_eq!(last.notification_type, "PROPOSAL_ACCEPTED");
    assert_eq!(change.proposal.status, ProposalStatus::Accepted);
}

#[tokio::test]
async fn status_write_failure_is_returned() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();

    h.store.fail_on(StoreOp::TransitionProposal);
    assert_matches!(
        h.workflow
            .proposals
            .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
            .await,
        Err(CoreError::Internal(_))
    );
    h.store.heal(StoreOp::TransitionProposal);

    assert_eq!(h.workflow.briefs.get(brief.id).await.unwrap().status, BriefStatus::Open);
    assert!(h.store.matches().is_empty());
}

#[tokio::test]
async fn one_match_per_accepted_pair() {
    let h = Harness::new();
    let brief = h.open_brief().await;

    // A stale recommendation row for the same pair already exists.
    h.store
        .upsert_match(UpsertMatch {
            brief_id: brief.id,
            manufacturer_profile_id: h.m1.id,
            match_type: MatchType::SystemRecommendation,
            score: 50,
        })
        .await
        .unwrap();

    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();

    let matches = h.store.matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].score, 100);
    assert_eq!(matches[0].match_type, "manual_selection");

    // A second accept is refused and adds nothing.
    assert_matches!(
        h.workflow
            .proposals
            .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
            .await,
        Err(CoreError::BadRequest(_))
    );
    assert_eq!(h.store.matches().len(), 1);
}

#[tokio::test]
async fn acceptance_closes_pending_siblings() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p1 = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    let p2 = h
        .workflow
        .proposals
        .create(h.m2.id, brief.id, terms(2400.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .update_status(p2.id, h.brand.id, ProposalStatus::UnderReview)
        .await
        .unwrap();

    let change = h
        .workflow
        .proposals
        .update_status(p1.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();
    let report = change.cascade.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.rejected_siblings, vec![p2.id]);

    let sibling = h
        .workflow
        .proposals
        .get(p2.id, brieflink_workflow::Party::Manufacturer(h.m2.id))
        .await
        .unwrap();
    assert_eq!(sibling.status, ProposalStatus::Rejected);

    let to_m2: Vec<_> = h
        .store
        .notifications()
        .into_iter()
        .filter(|n| n.recipient_actor_id == M2_ACTOR)
        .map(|n| n.notification_type)
        .collect();
    assert_eq!(to_m2, vec!["PROPOSAL_REJECTED"]);
}

#[tokio::test]
async fn siblings_stay_open_when_closing_is_disabled() {
    let h = Harness::with_config(WorkflowConfig {
        close_sibling_proposals: false,
        ..WorkflowConfig::default()
    });
    let brief = h.open_brief().await;
    let p1 = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    let p2 = h
        .workflow
        .proposals
        .create(h.m2.id, brief.id, terms(2400.0))
        .await
        .unwrap();

    let change = h
        .workflow
        .proposals
        .update_status(p1.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();
    assert!(change.cascade.unwrap().rejected_siblings.is_empty());

    let sibling = h
        .workflow
        .proposals
        .get(p2.id, brieflink_workflow::Party::Brand(h.brand.id))
        .await
        .unwrap();
    assert_eq!(sibling.status, ProposalStatus::Submitted);

    // The brief has moved on, so the sibling can no longer be accepted.
    assert_matches!(
        h.workflow
            .proposals
            .update_status(p2.id, h.brand.id, ProposalStatus::Accepted)
            .await,
        Err(CoreError::BadRequest(_))
    );
}

#[tokio::test]
async fn acceptance_is_allowed_from_matched() {
    let h = Harness::new();
    let brief = h.open_brief().await;
    let p = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    h.store
        .transition_brief(brief.id, &[BriefStatus::Open], BriefStatus::Matched)
        .await
        .unwrap()
        .unwrap();

    h.workflow
        .proposals
        .update_status(p.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(
        h.workflow.briefs.get(brief.id).await.unwrap().status,
        BriefStatus::InProgress
    );
}

// ---------------------------------------------------------------------------
// Overlapping acceptances
// ---------------------------------------------------------------------------

/// Delegates to an [`InMemoryStore`] but parks every acceptance write at a
/// barrier, so two decisions are both past their reads before either cascade
/// runs.
struct GatedStore {
    inner: Arc<InMemoryStore>,
    gate: Barrier,
}

#[async_trait]
impl RecordStore for GatedStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    async fn insert_brief(&self, input: CreateBrief) -> Result<Brief, StoreError> {
        self.inner.insert_brief(input).await
    }

    async fn find_brief(&self, id: DbId) -> Result<Option<Brief>, StoreError> {
        self.inner.find_brief(id).await
    }

    async fn update_brief(
        &self,
        id: DbId,
        input: &UpdateBrief,
        allowed: &[BriefStatus],
    ) -> Result<Option<Brief>, StoreError> {
        self.inner.update_brief(id, input, allowed).await
    }

    async fn transition_brief(
        &self,
        id: DbId,
        from: &[BriefStatus],
        to: BriefStatus,
    ) -> Result<Option<Brief>, StoreError> {
        self.inner.transition_brief(id, from, to).await
    }

    async fn soft_delete_brief(&self, id: DbId) -> Result<bool, StoreError> {
        self.inner.soft_delete_brief(id).await
    }

    async fn list_briefs_by_owner(
        &self,
        query: &BriefQuery,
    ) -> Result<(Vec<Brief>, i64), StoreError> {
        self.inner.list_briefs_by_owner(query).await
    }

    async fn list_open_briefs(&self, limit: i64) -> Result<Vec<Brief>, StoreError> {
        self.inner.list_open_briefs(limit).await
    }

    async fn find_briefs(&self, ids: &[DbId]) -> Result<Vec<Brief>, StoreError> {
        self.inner.find_briefs(ids).await
    }

    async fn insert_proposal(&self, input: CreateProposal) -> Result<ProposalInsert, StoreError> {
        self.inner.insert_proposal(input).await
    }

    async fn find_proposal(&self, id: DbId) -> Result<Option<Proposal>, StoreError> {
        self.inner.find_proposal(id).await
    }

    async fn find_active_proposal(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<Proposal>, StoreError> {
        self.inner
            .find_active_proposal(brief_id, manufacturer_profile_id)
            .await
    }

    async fn list_proposals_for_brief(&self, brief_id: DbId) -> Result<Vec<Proposal>, StoreError> {
        self.inner.list_proposals_for_brief(brief_id).await
    }

    async fn list_proposals_for_manufacturer(
        &self,
        manufacturer_profile_id: DbId,
    ) -> Result<Vec<Proposal>, StoreError> {
        self.inner
            .list_proposals_for_manufacturer(manufacturer_profile_id)
            .await
    }

    async fn list_proposals_in_status(
        &self,
        brief_id: DbId,
        statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError> {
        self.inner.list_proposals_in_status(brief_id, statuses).await
    }

    async fn transition_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError> {
        self.inner.transition_proposal(id, from, to).await
    }

    async fn accept_proposal(
        &self,
        id: DbId,
        from: ProposalStatus,
    ) -> Result<Option<Proposal>, StoreError> {
        let written = self.inner.accept_proposal(id, from).await;
        self.gate.wait().await;
        written
    }

    async fn reject_pending_proposals(
        &self,
        brief_id: DbId,
        keep: DbId,
    ) -> Result<Vec<Proposal>, StoreError> {
        self.inner.reject_pending_proposals(brief_id, keep).await
    }

    async fn upsert_match(&self, input: UpsertMatch) -> Result<EngagementMatch, StoreError> {
        self.inner.upsert_match(input).await
    }

    async fn find_match(
        &self,
        brief_id: DbId,
        manufacturer_profile_id: DbId,
    ) -> Result<Option<EngagementMatch>, StoreError> {
        self.inner.find_match(brief_id, manufacturer_profile_id).await
    }

    async fn append_log_entry(
        &self,
        input: CreateLogEntry,
    ) -> Result<ExecutionLogEntry, StoreError> {
        self.inner.append_log_entry(input).await
    }

    async fn list_log_entries(&self, brief_id: DbId) -> Result<Vec<ExecutionLogEntry>, StoreError> {
        self.inner.list_log_entries(brief_id).await
    }

    async fn insert_notification(
        &self,
        input: CreateNotification,
    ) -> Result<Notification, StoreError> {
        self.inner.insert_notification(input).await
    }

    async fn list_notifications(
        &self,
        recipient_actor_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        self.inner
            .list_notifications(recipient_actor_id, unread_only, limit, offset)
            .await
    }

    async fn mark_notification_read(
        &self,
        recipient_actor_id: DbId,
        id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        self.inner.mark_notification_read(recipient_actor_id, id).await
    }

    async fn mark_all_notifications_read(
        &self,
        recipient_actor_id: DbId,
    ) -> Result<u64, StoreError> {
        self.inner.mark_all_notifications_read(recipient_actor_id).await
    }

    async fn unread_notification_count(&self, recipient_actor_id: DbId) -> Result<i64, StoreError> {
        self.inner.unread_notification_count(recipient_actor_id).await
    }
}

#[tokio::test]
async fn overlapping_acceptances_on_one_brief_accept_only_one() {
    let h = Harness::new();
    let gated = Arc::new(GatedStore {
        inner: Arc::clone(&h.store),
        gate: Barrier::new(2),
    });
    let workflow = Workflow::new(
        Arc::clone(&gated) as Arc<dyn RecordStore>,
        Arc::clone(&h.directory) as Arc<dyn ProfileDirectory>,
        Arc::clone(&h.bus),
        WorkflowConfig {
            close_sibling_proposals: false,
            ..WorkflowConfig::default()
        },
    );

    let brief = h.open_brief().await;
    let p1 = workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    let p2 = workflow
        .proposals
        .create(h.m2.id, brief.id, terms(2400.0))
        .await
        .unwrap();

    // Both decisions read an OPEN brief before either writes.
    let (r1, r2) = tokio::join!(
        workflow
            .proposals
            .update_status(p1.id, h.brand.id, ProposalStatus::Accepted),
        workflow
            .proposals
            .update_status(p2.id, h.brand.id, ProposalStatus::Accepted),
    );

    let (won, lost) = match (r1, r2) {
        (Ok(change), Err(err)) => (change, err),
        (Err(err), Ok(change)) => (change, err),
        (r1, r2) => panic!("expected exactly one acceptance, got {r1:?} and {r2:?}"),
    };
    assert_eq!(won.proposal.status, ProposalStatus::Accepted);
    assert!(won.cascade.unwrap().is_clean());
    assert_matches!(lost, CoreError::Conflict(_));

    let accepted: Vec<_> = h
        .store
        .list_proposals_in_status(brief.id, &[ProposalStatus::Accepted])
        .await
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, won.proposal.id);

    let matches = h.store.matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].manufacturer_profile_id, won.proposal.manufacturer_profile_id);
    assert_eq!(h.store.list_log_entries(brief.id).await.unwrap().len(), 1);

    let accepted_notices = h
        .store
        .notifications()
        .into_iter()
        .filter(|n| n.notification_type == "PROPOSAL_ACCEPTED")
        .count();
    assert_eq!(accepted_notices, 1);
}

#[tokio::test]
async fn accept_write_refuses_a_brief_that_already_has_an_accepted_proposal() {
    let h = Harness::with_config(WorkflowConfig {
        close_sibling_proposals: false,
        ..WorkflowConfig::default()
    });
    let brief = h.open_brief().await;
    let p1 = h
        .workflow
        .proposals
        .create(h.m1.id, brief.id, terms(2000.0))
        .await
        .unwrap();
    let p2 = h
        .workflow
        .proposals
        .create(h.m2.id, brief.id, terms(2400.0))
        .await
        .unwrap();
    h.workflow
        .proposals
        .update_status(p1.id, h.brand.id, ProposalStatus::Accepted)
        .await
        .unwrap();

    // Put the brief back so only the sibling guard stands in the way.
    h.store
        .transition_brief(brief.id, &[BriefStatus::InProgress], BriefStatus::Open)
        .await
        .unwrap()
        .unwrap();
    let refused = h
        .store
        .accept_proposal(p2.id, ProposalStatus::Submitted)
        .await
        .unwrap();
    assert!(refused.is_none());

    let p2 = h.store.find_proposal(p2.id).await.unwrap().unwrap();
    assert_eq!(p2.status, ProposalStatus::Submitted);
}
