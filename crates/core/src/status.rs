//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table. The string label is
//! the wire representation used in JSON bodies and query strings.

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// A status ID with no matching enum variant (seed data drift).
#[derive(Debug, thiserror::Error)]
#[error("Unknown {kind} id {id}")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub id: StatusId,
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a status by its database ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The wire label, e.g. `"IN_PROGRESS"`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = UnknownStatus;

            fn try_from(id: StatusId) -> Result<Self, Self::Error> {
                Self::from_id(id).ok_or(UnknownStatus {
                    kind: stringify!($name),
                    id,
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Brief lifecycle status.
    ///
    /// `Open` is the "active" state in which a brief is visible to
    /// manufacturers and accepts proposals. `Matched` is reserved for a
    /// future systemic-match flow and is treated like `Open` for acceptance.
    BriefStatus {
        Draft = 1 => "DRAFT",
        Open = 2 => "OPEN",
        Matched = 3 => "MATCHED",
        InProgress = 4 => "IN_PROGRESS",
        Completed = 5 => "COMPLETED",
        Cancelled = 6 => "CANCELLED",
    }
}

impl BriefStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Only open briefs take new proposals.
    pub fn accepts_proposals(self) -> bool {
        self == Self::Open
    }

    /// Whether a proposal against a brief in this state may be accepted.
    pub fn allows_acceptance(self) -> bool {
        matches!(self, Self::Open | Self::Matched)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        use BriefStatus::*;
        match (self, next) {
            (Draft, Open) => true,
            (Open, Matched) => true,
            (Open | Matched, InProgress) => true,
            (InProgress, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

define_status_enum! {
    /// Proposal lifecycle status.
    ///
    /// `CounterOffered` exists in the status table but has no transition
    /// logic; negotiation is not implemented.
    ProposalStatus {
        Submitted = 1 => "SUBMITTED",
        UnderReview = 2 => "UNDER_REVIEW",
        Accepted = 3 => "ACCEPTED",
        Rejected = 4 => "REJECTED",
        Withdrawn = 5 => "WITHDRAWN",
        CounterOffered = 6 => "COUNTER_OFFERED",
    }
}

impl ProposalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Withdrawn)
    }

    /// Every status except `Withdrawn` occupies the (brief, manufacturer) slot.
    pub fn is_active(self) -> bool {
        self != Self::Withdrawn
    }

    /// Pending proposals are the ones a brand has not decided on yet.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Submitted | Self::UnderReview)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        use ProposalStatus::*;
        match (self, next) {
            (Submitted, UnderReview) => true,
            (Submitted | UnderReview, Accepted | Rejected | Withdrawn) => true,
            _ => false,
        }
    }
}

/// Check a proposal transition, producing the message surfaced to callers.
pub fn validate_proposal_transition(
    from: ProposalStatus,
    to: ProposalStatus,
) -> Result<(), String> {
    if to == ProposalStatus::CounterOffered || from == ProposalStatus::CounterOffered {
        return Err("Counter offers are not supported".to_string());
    }
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(format!("Cannot move proposal from {from} to {to}"))
    }
}
