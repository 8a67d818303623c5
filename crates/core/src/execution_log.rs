//! Execution log entry types and the messages the workflow writes itself.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::brief::validate_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Milestone,
    Update,
    Issue,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Milestone => "MILESTONE",
            Self::Update => "UPDATE",
            Self::Issue => "ISSUE",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "MILESTONE" => Some(Self::Milestone),
            "UPDATE" => Some(Self::Update),
            "ISSUE" => Some(Self::Issue),
            _ => None,
        }
    }
}

/// A log entry written by either party during execution.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewLogEntry {
    pub entry_type: EntryType,
    #[validate(custom(function = "validate_not_blank"), length(max = 10000))]
    pub content: String,
}

pub fn project_started_message(brief_title: &str, manufacturer_name: &str) -> String {
    format!("Project started: \"{brief_title}\" awarded to {manufacturer_name}.")
}

pub fn project_completed_message(brief_title: &str) -> String {
    format!("Project completed: \"{brief_title}\".")
}
