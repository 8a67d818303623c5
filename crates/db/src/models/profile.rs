//! Read models for the profile directory tables.

use brieflink_core::matching::{Capability, VerificationStatus};
use brieflink_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from `brand_profiles`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrandProfile {
    pub id: DbId,
    pub actor_id: DbId,
    pub company_name: String,
}

/// A row from `manufacturer_profiles`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ManufacturerProfile {
    pub id: DbId,
    pub actor_id: DbId,
    pub company_name: String,
    pub logo_url: Option<String>,
    pub verification_status: String,
}

impl ManufacturerProfile {
    pub fn verification(&self) -> VerificationStatus {
        VerificationStatus::parse(&self.verification_status)
    }
}

/// A row from `manufacturer_capabilities`.
#[derive(Debug, Clone, FromRow)]
pub struct CapabilityRow {
    pub manufacturer_profile_id: DbId,
    pub category: String,
    pub subcategories: Vec<String>,
}

impl From<CapabilityRow> for Capability {
    fn from(row: CapabilityRow) -> Self {
        Capability {
            category: row.category,
            subcategories: row.subcategories,
        }
    }
}
