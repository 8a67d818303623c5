//! Read shapes returned by the services, composed from several records.

use brieflink_core::status::BriefStatus;
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;
use brieflink_db::models::profile::ManufacturerProfile;
use brieflink_db::models::proposal::Proposal;
use serde::Serialize;

/// Public face of a manufacturer as shown to brands.
#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerSnapshot {
    pub id: DbId,
    pub company_name: String,
    pub logo_url: Option<String>,
    pub verification_status: String,
}

impl From<&ManufacturerProfile> for ManufacturerSnapshot {
    fn from(p: &ManufacturerProfile) -> Self {
        Self {
            id: p.id,
            company_name: p.company_name.clone(),
            logo_url: p.logo_url.clone(),
            verification_status: p.verification_status.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BriefSnapshot {
    pub id: DbId,
    pub title: String,
    pub status: BriefStatus,
}

impl From<&Brief> for BriefSnapshot {
    fn from(b: &Brief) -> Self {
        Self {
            id: b.id,
            title: b.title.clone(),
            status: b.status,
        }
    }
}

/// A proposal as listed to the brief owner.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalWithManufacturer {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub manufacturer: Option<ManufacturerSnapshot>,
}

/// A proposal as listed to its manufacturer.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalWithBrief {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub brief: Option<BriefSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BriefPage {
    pub items: Vec<Brief>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// A scored candidate with a human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<T> {
    pub candidate: T,
    pub score: i32,
    pub reason: String,
}
