//! Brief entity model and DTOs.

use brieflink_core::brief::{BriefFields, BriefRequirements, Budget};
use brieflink_core::status::BriefStatus;
use brieflink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `briefs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brief {
    pub id: DbId,
    pub brand_profile_id: DbId,
    pub title: String,
    pub description: String,
    pub requirements: Json<BriefRequirements>,
    pub budget_min: f64,
    pub budget_max: f64,
    pub currency: String,
    pub category: String,
    pub timeline: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: BriefStatus,
    pub ai_generated: bool,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Brief {
    /// The owner-editable fields, as validated on create.
    pub fn fields(&self) -> BriefFields {
        BriefFields {
            title: self.title.clone(),
            description: self.description.clone(),
            requirements: self.requirements.0.clone(),
            budget: Budget {
                min: self.budget_min,
                max: self.budget_max,
            },
            currency: self.currency.clone(),
            category: self.category.clone(),
            timeline: self.timeline.clone(),
            ai_generated: self.ai_generated,
        }
    }
}

/// DTO for inserting a brief. Status always starts at `DRAFT`.
#[derive(Debug, Clone)]
pub struct CreateBrief {
    pub brand_profile_id: DbId,
    pub fields: BriefFields,
}

/// DTO for a partial update. `None` columns are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBrief {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<BriefRequirements>,
    pub budget: Option<Budget>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub timeline: Option<String>,
}

/// Owner-scoped listing query, already clamped.
#[derive(Debug, Clone)]
pub struct BriefQuery {
    pub brand_profile_id: DbId,
    pub status: Option<BriefStatus>,
    pub category: Option<String>,
    pub sort: brieflink_core::brief::BriefSort,
    pub direction: brieflink_core::brief::SortDirection,
    pub limit: i64,
    pub offset: i64,
}

impl From<brieflink_core::brief::BriefPatch> for UpdateBrief {
    fn from(patch: brieflink_core::brief::BriefPatch) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            requirements: patch.requirements,
            budget: patch.budget,
            currency: patch.currency,
            category: patch.category,
            timeline: patch.timeline,
        }
    }
}
