//! Proposal entity model and DTOs.

use brieflink_core::proposal::{ProposalDetails, ProposalTerms};
use brieflink_core::status::ProposalStatus;
use brieflink_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `proposals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Proposal {
    pub id: DbId,
    pub brief_id: DbId,
    pub manufacturer_profile_id: DbId,
    pub price: f64,
    pub currency: String,
    pub delivery_timeline: String,
    pub target_delivery_date: Option<NaiveDate>,
    pub details: Json<ProposalDetails>,
    pub attachments: Json<Vec<String>>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ProposalStatus,
    /// Reserved for negotiation; always empty.
    pub counter_offer_history: Json<Vec<serde_json::Value>>,
    pub submitted_at: Timestamp,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// DTO for inserting a proposal. Status always starts at `SUBMITTED`.
#[derive(Debug, Clone)]
pub struct CreateProposal {
    pub brief_id: DbId,
    pub manufacturer_profile_id: DbId,
    pub terms: ProposalTerms,
}
