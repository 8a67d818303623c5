//! Notification types and their user-facing copy.
//!
//! The `notification_type` column stores [`NotificationType::as_str`];
//! the deep-link `data` payload always carries the ids a client needs to
//! open the relevant brief or proposal.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    ProposalReceived,
    ProposalAccepted,
    ProposalRejected,
    ProposalWithdrawn,
    BriefCancelled,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProposalReceived => "PROPOSAL_RECEIVED",
            Self::ProposalAccepted => "PROPOSAL_ACCEPTED",
            Self::ProposalRejected => "PROPOSAL_REJECTED",
            Self::ProposalWithdrawn => "PROPOSAL_WITHDRAWN",
            Self::BriefCancelled => "BRIEF_CANCELLED",
        }
    }

    /// Event-bus name for this notification, e.g. `"proposal.accepted"`.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::ProposalReceived => "proposal.received",
            Self::ProposalAccepted => "proposal.accepted",
            Self::ProposalRejected => "proposal.rejected",
            Self::ProposalWithdrawn => "proposal.withdrawn",
            Self::BriefCancelled => "brief.cancelled",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully rendered notification, ready to hand to the emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}

fn proposal_link(brief_id: DbId, proposal_id: DbId) -> serde_json::Value {
    serde_json::json!({ "brief_id": brief_id, "proposal_id": proposal_id })
}

/// Sent to the brand when a manufacturer submits a proposal.
pub fn proposal_received(
    brief_id: DbId,
    proposal_id: DbId,
    brief_title: &str,
) -> NotificationContent {
    NotificationContent {
        notification_type: NotificationType::ProposalReceived,
        title: "New proposal received".to_string(),
        message: format!("A manufacturer submitted a proposal for \"{brief_title}\"."),
        data: proposal_link(brief_id, proposal_id),
    }
}

/// Sent to the manufacturer when their proposal is accepted or rejected.
pub fn proposal_decided(
    accepted: bool,
    brief_id: DbId,
    proposal_id: DbId,
    brief_title: &str,
) -> NotificationContent {
    if accepted {
        NotificationContent {
            notification_type: NotificationType::ProposalAccepted,
            title: "Proposal accepted".to_string(),
            message: format!(
                "Your proposal for \"{brief_title}\" was accepted. The project has started."
            ),
            data: proposal_link(brief_id, proposal_id),
        }
    } else {
        NotificationContent {
            notification_type: NotificationType::ProposalRejected,
            title: "Proposal not selected".to_string(),
            message: format!("Your proposal for \"{brief_title}\" was not selected."),
            data: proposal_link(brief_id, proposal_id),
        }
    }
}

/// Sent to the brand when a manufacturer withdraws a proposal.
pub fn proposal_withdrawn(
    brief_id: DbId,
    proposal_id: DbId,
    brief_title: &str,
) -> NotificationContent {
    NotificationContent {
        notification_type: NotificationType::ProposalWithdrawn,
        title: "Proposal withdrawn".to_string(),
        message: format!("A manufacturer withdrew their proposal for \"{brief_title}\"."),
        data: proposal_link(brief_id, proposal_id),
    }
}

/// Sent to manufacturers with pending proposals when the brand cancels.
pub fn brief_cancelled(brief_id: DbId, brief_title: &str) -> NotificationContent {
    NotificationContent {
        notification_type: NotificationType::BriefCancelled,
        title: "Brief cancelled".to_string(),
        message: format!("\"{brief_title}\" was cancelled by the brand."),
        data: serde_json::json!({ "brief_id": brief_id }),
    }
}
