//! Proposal lifecycle.
//!
//! SUBMITTED -> UNDER_REVIEW -> ACCEPTED | REJECTED, with review optional
//! and WITHDRAWN open to the submitting manufacturer until a decision.
//! Acceptance and rejection hand off to the [`AcceptanceOrchestrator`].

use std::collections::HashMap;
use std::sync::Arc;

use brieflink_core::error::CoreError;
use brieflink_core::notification::{proposal_received, proposal_withdrawn, NotificationContent};
use brieflink_core::proposal::ProposalTerms;
use brieflink_core::status::{validate_proposal_transition, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;
use brieflink_db::models::proposal::{CreateProposal, Proposal};
use serde::Serialize;
use validator::Validate;

use crate::notifier::NotificationEmitter;
use crate::orchestrator::{AcceptanceOrchestrator, CascadeReport};
use crate::store::{ProfileDirectory, ProposalInsert, RecordStore};
use crate::views::{
    BriefSnapshot, ManufacturerSnapshot, ProposalWithBrief, ProposalWithManufacturer,
};
use crate::Party;

/// Result of a brand-side status change.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub proposal: Proposal,
    /// Present for ACCEPTED / REJECTED.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<CascadeReport>,
}

#[derive(Clone)]
pub struct ProposalLifecycle {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn ProfileDirectory>,
    notifications: NotificationEmitter,
    orchestrator: AcceptanceOrchestrator,
}

impl ProposalLifecycle {
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn ProfileDirectory>,
        notifications: NotificationEmitter,
        orchestrator: AcceptanceOrchestrator,
    ) -> Self {
        Self {
            store,
            directory,
            notifications,
            orchestrator,
        }
    }

    async fn load_brief(&self, id: DbId) -> Result<Brief, CoreError> {
        self.store
            .find_brief(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Brief", id })
    }

    async fn load(&self, id: DbId) -> Result<Proposal, CoreError> {
        self.store
            .find_proposal(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Proposal",
                id,
            })
    }

    /// Submit a proposal against an open brief.
    pub async fn create(
        &self,
        manufacturer_id: DbId,
        brief_id: DbId,
        terms: ProposalTerms,
    ) -> Result<Proposal, CoreError> {
        terms.validate()?;
        let brief = self.load_brief(brief_id).await?;

        if self
            .store
            .find_active_proposal(brief_id, manufacturer_id)
            .await?
            .is_some()
        {
            return Err(duplicate());
        }
        if !brief.status.accepts_proposals() {
            return Err(not_accepting());
        }

        let input = CreateProposal {
            brief_id,
            manufacturer_profile_id: manufacturer_id,
            terms,
        };
        let proposal = match self.store.insert_proposal(input).await? {
            ProposalInsert::Inserted(p) => p,
            ProposalInsert::BriefNotOpen => return Err(not_accepting()),
            ProposalInsert::Duplicate => return Err(duplicate()),
        };

        tracing::info!(
            proposal_id = proposal.id,
            brief_id,
            manufacturer_profile_id = manufacturer_id,
            "Proposal submitted"
        );

        self.notify_brand(&brief, proposal_received(brief.id, proposal.id, &brief.title))
            .await;
        Ok(proposal)
    }

    /// All proposals on a brief, newest first, for its owner.
    pub async fn list_for_brief(
        &self,
        brief_id: DbId,
        caller_brand_id: DbId,
    ) -> Result<Vec<ProposalWithManufacturer>, CoreError> {
        let brief = self.load_brief(brief_id).await?;
        if brief.brand_profile_id != caller_brand_id {
            return Err(CoreError::Forbidden("You do not own this brief".into()));
        }

        let proposals = self.store.list_proposals_for_brief(brief_id).await?;
        let ids: Vec<DbId> = proposals.iter().map(|p| p.manufacturer_profile_id).collect();
        let manufacturers: HashMap<DbId, ManufacturerSnapshot> = self
            .directory
            .manufacturers(&ids)
            .await?
            .iter()
            .map(|m| (m.id, ManufacturerSnapshot::from(m)))
            .collect();

        Ok(proposals
            .into_iter()
            .map(|p| ProposalWithManufacturer {
                manufacturer: manufacturers.get(&p.manufacturer_profile_id).cloned(),
                proposal: p,
            })
            .collect())
    }

    /// The manufacturer's own proposals, newest first.
    pub async fn list_mine(
        &self,
        manufacturer_id: DbId,
    ) -> Result<Vec<ProposalWithBrief>, CoreError> {
        let proposals = self
            .store
            .list_proposals_for_manufacturer(manufacturer_id)
            .await?;
        let ids: Vec<DbId> = proposals.iter().map(|p| p.brief_id).collect();
        let briefs: HashMap<DbId, BriefSnapshot> = self
            .store
            .find_briefs(&ids)
            .await?
            .iter()
            .map(|b| (b.id, BriefSnapshot::from(b)))
            .collect();

        Ok(proposals
            .into_iter()
            .map(|p| ProposalWithBrief {
                brief: briefs.get(&p.brief_id).cloned(),
                proposal: p,
            })
            .collect())
    }

    /// A proposal, visible to its manufacturer and the brief owner.
    pub async fn get(&self, id: DbId, caller: Party) -> Result<Proposal, CoreError> {
        let proposal = self.load(id).await?;
        let visible = match caller {
            Party::Manufacturer(m) => proposal.manufacturer_profile_id == m,
            Party::Brand(b) => self
                .store
                .find_brief(proposal.brief_id)
                .await?
                .is_some_and(|brief| brief.brand_profile_id == b),
        };
        if !visible {
            return Err(CoreError::Forbidden("You cannot view this proposal".into()));
        }
        Ok(proposal)
    }

    /// Brand-side status change: UNDER_REVIEW, ACCEPTED or REJECTED.
    pub async fn update_status(
        &self,
        proposal_id: DbId,
        caller_brand_id: DbId,
        new_status: ProposalStatus,
    ) -> Result<StatusChange, CoreError> {
        let proposal = self.load(proposal_id).await?;
        let brief = self.load_brief(proposal.brief_id).await?;
        if brief.brand_profile_id != caller_brand_id {
            return Err(CoreError::Forbidden("You do not own this brief".into()));
        }

        if new_status == ProposalStatus::Withdrawn {
            return Err(CoreError::BadRequest(
                "Only the submitting manufacturer can withdraw a proposal".into(),
            ));
        }
        validate_proposal_transition(proposal.status, new_status).map_err(CoreError::BadRequest)?;

        match new_status {
            ProposalStatus::Accepted | ProposalStatus::Rejected => {
                if new_status == ProposalStatus::Accepted && !brief.status.allows_acceptance() {
                    return Err(CoreError::BadRequest(format!(
                        "Acceptance needs an OPEN or MATCHED brief (brief is {})",
                        brief.status
                    )));
                }
                let decision = self.orchestrator.decide(&brief, &proposal, new_status).await?;
                Ok(StatusChange {
                    proposal: decision.proposal,
                    cascade: Some(decision.cascade),
                })
            }
            _ => {
                let updated = self
                    .store
                    .transition_proposal(proposal.id, proposal.status, new_status)
                    .await?
                    .ok_or_else(stale)?;
                tracing::info!(proposal_id, status = %new_status, "Proposal status updated");
                Ok(StatusChange {
                    proposal: updated,
                    cascade: None,
                })
            }
        }
    }

    /// Manufacturer-side withdrawal. Frees the pair for a new submission.
    pub async fn withdraw(
        &self,
        proposal_id: DbId,
        manufacturer_id: DbId,
    ) -> Result<Proposal, CoreError> {
        let proposal = self.load(proposal_id).await?;
        if proposal.manufacturer_profile_id != manufacturer_id {
            return Err(CoreError::Forbidden(
                "Only the submitting manufacturer can withdraw a proposal".into(),
            ));
        }
        validate_proposal_transition(proposal.status, ProposalStatus::Withdrawn)
            .map_err(CoreError::BadRequest)?;

        let withdrawn = self
            .store
            .transition_proposal(proposal.id, proposal.status, ProposalStatus::Withdrawn)
            .await?
            .ok_or_else(stale)?;
        tracing::info!(
            proposal_id,
            manufacturer_profile_id = manufacturer_id,
            "Proposal withdrawn"
        );

        match self.store.find_brief(withdrawn.brief_id).await {
            Ok(Some(brief)) => {
                let content = proposal_withdrawn(brief.id, withdrawn.id, &brief.title);
                self.notify_brand(&brief, content).await;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(proposal_id, error = %e, "Withdrawal notice not sent");
            }
        }
        Ok(withdrawn)
    }

    /// Best effort: resolve the owner's actor and emit.
    async fn notify_brand(&self, brief: &Brief, content: NotificationContent) {
        match self.directory.brand(brief.brand_profile_id).await {
            Ok(Some(brand)) => {
                self.notifications.emit(brand.actor_id, content).await;
            }
            Ok(None) => {
                tracing::warn!(
                    brand_profile_id = brief.brand_profile_id,
                    "Brief owner has no profile, notification dropped"
                );
            }
            Err(e) => {
                tracing::warn!(
                    brand_profile_id = brief.brand_profile_id,
                    error = %e,
                    "Brief owner lookup failed, notification dropped"
                );
            }
        }
    }
}

fn duplicate() -> CoreError {
    CoreError::Conflict("An active proposal already exists for this brief".into())
}

fn not_accepting() -> CoreError {
    CoreError::BadRequest("Brief is not accepting proposals".into())
}

fn stale() -> CoreError {
    CoreError::Conflict("Proposal status changed while it was being updated".into())
}
