//! Side effects of deciding on a proposal.
//!
//! Only the proposal status write can fail the call. Every later step is
//! attempted independently; a failure is logged and listed in the returned
//! [`CascadeReport`] but never undoes the decision.

use std::sync::Arc;

use brieflink_core::error::CoreError;
use brieflink_core::execution_log::project_started_message;
use brieflink_core::matching::{MatchType, ACCEPTED_MATCH_SCORE};
use brieflink_core::notification::proposal_decided;
use brieflink_core::status::{BriefStatus, ProposalStatus};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;
use brieflink_db::models::engagement_match::UpsertMatch;
use brieflink_db::models::proposal::Proposal;
use serde::Serialize;

use crate::execution_log::ExecutionLog;
use crate::notifier::NotificationEmitter;
use crate::store::{ProfileDirectory, RecordStore};

/// A best-effort step after the status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeStep {
    BriefInProgress,
    MatchRecord,
    ExecutionLog,
    CloseSiblings,
    NotifyManufacturer,
}

impl CascadeStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BriefInProgress => "brief_in_progress",
            Self::MatchRecord => "match_record",
            Self::ExecutionLog => "execution_log",
            Self::CloseSiblings => "close_siblings",
            Self::NotifyManufacturer => "notify_manufacturer",
        }
    }
}

/// What happened after the decision was stored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CascadeReport {
    pub failed_steps: Vec<CascadeStep>,
    /// Proposals auto-rejected because a sibling was accepted.
    pub rejected_siblings: Vec<DbId>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failed_steps.is_empty()
    }

    fn record<T>(
        &mut self,
        step: CascadeStep,
        proposal_id: DbId,
        result: Result<T, CoreError>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    step = step.as_str(),
                    proposal_id,
                    error = %e,
                    "Acceptance cascade step failed"
                );
                self.failed_steps.push(step);
                None
            }
        }
    }
}

/// A stored decision plus its cascade outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub proposal: Proposal,
    pub cascade: CascadeReport,
}

#[derive(Clone)]
pub struct AcceptanceOrchestrator {
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn ProfileDirectory>,
    notifications: NotificationEmitter,
    execution_log: ExecutionLog,
    close_sibling_proposals: bool,
}

impl AcceptanceOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn ProfileDirectory>,
        notifications: NotificationEmitter,
        execution_log: ExecutionLog,
        close_sibling_proposals: bool,
    ) -> Self {
        Self {
            store,
            directory,
            notifications,
            execution_log,
            close_sibling_proposals,
        }
    }

    /// Store an `ACCEPTED` / `REJECTED` decision and run its cascade.
    ///
    /// Callers have already checked ownership and the transition. The write
    /// is conditional on `proposal.status`, and an acceptance also on the
    /// brief still taking one with no sibling accepted. Losing either race is
    /// a `Conflict`.
    pub async fn decide(
        &self,
        brief: &Brief,
        proposal: &Proposal,
        decision: ProposalStatus,
    ) -> Result<Decision, CoreError> {
        let accepted = match decision {
            ProposalStatus::Accepted => true,
            ProposalStatus::Rejected => false,
            other => {
                return Err(CoreError::Internal(format!(
                    "Orchestrator cannot apply {other}"
                )))
            }
        };

        let written = if accepted {
            self.store
                .accept_proposal(proposal.id, proposal.status)
                .await?
        } else {
            self.store
                .transition_proposal(proposal.id, proposal.status, decision)
                .await?
        };
        let updated = written.ok_or_else(|| {
            CoreError::Conflict(
                "Proposal or brief changed while the decision was being stored".into(),
            )
        })?;

        tracing::info!(
            proposal_id = updated.id,
            brief_id = brief.id,
            status = %decision,
            "Proposal decided"
        );

        let mut report = CascadeReport::default();

        if accepted {
            let step = self.start_project(brief.id).await;
            report.record(CascadeStep::BriefInProgress, updated.id, step);

            let step = self.record_match(&updated).await;
            report.record(CascadeStep::MatchRecord, updated.id, step);

            let step = self.log_project_start(brief, &updated).await;
            report.record(CascadeStep::ExecutionLog, updated.id, step);

            if self.close_sibling_proposals {
                let step = self.close_siblings(brief, &updated).await;
                if let Some((rejected, undelivered)) =
                    report.record(CascadeStep::CloseSiblings, updated.id, step)
                {
                    if undelivered > 0 {
                        report.failed_steps.push(CascadeStep::CloseSiblings);
                    }
                    report.rejected_siblings = rejected;
                }
            }
        }

        let step = self.notify_manufacturer(brief, &updated, accepted).await;
        report.record(CascadeStep::NotifyManufacturer, updated.id, step);

        Ok(Decision {
            proposal: updated,
            cascade: report,
        })
    }

    async fn start_project(&self, brief_id: DbId) -> Result<(), CoreError> {
        self.store
            .transition_brief(
                brief_id,
                &[BriefStatus::Open, BriefStatus::Matched],
                BriefStatus::InProgress,
            )
            .await?
            .map(|_| ())
            .ok_or_else(|| CoreError::Conflict("Brief was no longer OPEN or MATCHED".into()))
    }

    async fn record_match(&self, proposal: &Proposal) -> Result<(), CoreError> {
        self.store
            .upsert_match(UpsertMatch {
                brief_id: proposal.brief_id,
                manufacturer_profile_id: proposal.manufacturer_profile_id,
                match_type: MatchType::ManualSelection,
                score: ACCEPTED_MATCH_SCORE,
            })
            .await?;
        Ok(())
    }

    async fn log_project_start(&self, brief: &Brief, proposal: &Proposal) -> Result<(), CoreError> {
        let brand = self
            .directory
            .brand(brief.brand_profile_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "BrandProfile",
                id: brief.brand_profile_id,
            })?;
        let manufacturer_name = self
            .directory
            .manufacturer(proposal.manufacturer_profile_id)
            .await?
            .map(|m| m.company_name)
            .unwrap_or_else(|| "the selected manufacturer".to_string());

        self.execution_log
            .record_milestone(
                brief.id,
                brand.actor_id,
                project_started_message(&brief.title, &manufacturer_name),
            )
            .await?;
        Ok(())
    }

    /// Reject the other pending proposals and tell their manufacturers.
    ///
    /// Returns the rejected IDs and how many of those manufacturers could
    /// not be notified.
    async fn close_siblings(
        &self,
        brief: &Brief,
        accepted: &Proposal,
    ) -> Result<(Vec<DbId>, usize), CoreError> {
        let rejected = self
            .store
            .reject_pending_proposals(brief.id, accepted.id)
            .await?;

        let mut undelivered = 0;
        for sibling in &rejected {
            if let Err(e) = self.notify_manufacturer(brief, sibling, false).await {
                tracing::warn!(
                    proposal_id = sibling.id,
                    error = %e,
                    "Sibling rejection not notified"
                );
                undelivered += 1;
            }
        }
        Ok((rejected.iter().map(|p| p.id).collect(), undelivered))
    }

    async fn notify_manufacturer(
        &self,
        brief: &Brief,
        proposal: &Proposal,
        accepted: bool,
    ) -> Result<(), CoreError> {
        let manufacturer = self
            .directory
            .manufacturer(proposal.manufacturer_profile_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ManufacturerProfile",
                id: proposal.manufacturer_profile_id,
            })?;
        let content = proposal_decided(accepted, brief.id, proposal.id, &brief.title);
        self.notifications
            .emit(manufacturer.actor_id, content)
            .await
            .map(|_| ())
            .ok_or_else(|| CoreError::Internal("Notification was not stored".into()))
    }
}
