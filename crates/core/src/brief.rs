//! Brief field types, validation rules and list options.
//!
//! A brief's requirements and budget are typed structures rather than an
//! open JSON map so the matching and display logic can rely on known fields.
//! The same [`BriefFields`] shape is validated on create and, after merging a
//! [`BriefPatch`], on update.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::status::BriefStatus;

/// Currency applied when a create request omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// What the brand needs produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BriefRequirements {
    #[validate(custom(function = "validate_not_blank"))]
    pub product_type: String,
    #[validate(range(min = 1, message = "quantity must be greater than zero"))]
    pub quantity: i32,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_standards: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_notes: Option<String>,
}

/// Budget range in the brief's currency. `max` must not be below `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_budget_order"))]
pub struct Budget {
    #[validate(range(min = 0.0, message = "budget min must not be negative"))]
    pub min: f64,
    #[validate(range(min = 0.0, message = "budget max must not be negative"))]
    pub max: f64,
}

/// The full set of owner-editable brief fields.
///
/// Titles need 5 to 200 characters and descriptions at least 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BriefFields {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[validate(length(min = 20))]
    pub description: String,
    #[validate(nested)]
    pub requirements: BriefRequirements,
    #[validate(nested)]
    pub budget: Budget,
    #[serde(default = "default_currency")]
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub timeline: String,
    #[serde(default)]
    pub ai_generated: bool,
}

/// Partial update of a brief. Only `Some` fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BriefPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<BriefRequirements>,
    pub budget: Option<Budget>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub timeline: Option<String>,
}

impl BriefPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.requirements.is_none()
            && self.budget.is_none()
            && self.currency.is_none()
            && self.category.is_none()
            && self.timeline.is_none()
    }

    /// Merge this patch over `current`, returning the candidate field set.
    ///
    /// The result still has to pass [`Validate::validate`].
    pub fn apply_to(self, current: BriefFields) -> BriefFields {
        BriefFields {
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            requirements: self.requirements.unwrap_or(current.requirements),
            budget: self.budget.unwrap_or(current.budget),
            currency: self.currency.unwrap_or(current.currency),
            category: self.category.unwrap_or(current.category),
            timeline: self.timeline.unwrap_or(current.timeline),
            ai_generated: current.ai_generated,
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn validate_budget_order(budget: &Budget) -> Result<(), ValidationError> {
    if budget.max >= budget.min {
        Ok(())
    } else {
        let mut err = ValidationError::new("budget_order");
        err.message = Some("budget max must be greater than or equal to min".into());
        Err(err)
    }
}

/// Currencies are ISO-4217 style three-letter uppercase codes.
pub fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("currency");
        err.message = Some(format!("Invalid currency '{currency}', expected e.g. USD").into());
        Err(err)
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Sort key for owner brief listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl BriefSort {
    /// Column name used in `ORDER BY`. Never user-supplied text.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filters and paging for listing an owner's briefs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BriefListFilter {
    pub status: Option<BriefStatus>,
    pub category: Option<String>,
    #[serde(default)]
    pub sort: BriefSort,
    #[serde(default)]
    pub direction: SortDirection,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
