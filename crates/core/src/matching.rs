//! Matching score policy.
//!
//! Capabilities are nominal tags, so scoring is deliberately coarse:
//! a category hit scores [`CATEGORY_MATCH_SCORE`], a verified manufacturer
//! with no category to compare scores [`VERIFIED_BASELINE_SCORE`], and
//! anything else is excluded rather than ranked.

use serde::{Deserialize, Serialize};

/// Score for a recommendation whose category matched.
pub const CATEGORY_MATCH_SCORE: i32 = 100;

/// Score for a verified manufacturer when the brief has no category.
pub const VERIFIED_BASELINE_SCORE: i32 = 50;

/// Score recorded on the match created when a proposal is accepted.
pub const ACCEPTED_MATCH_SCORE: i32 = 100;

/// How many of the most recent open briefs a manufacturer-side scan looks at.
pub const DEFAULT_RECOMMENDATION_WINDOW: i64 = 50;

/// Reason attached to baseline (uncategorised) recommendations.
pub const VERIFIED_REASON: &str = "Verified manufacturer";

/// How a match record came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// The brand accepted this manufacturer's proposal.
    ManualSelection,
    /// Reserved for matches proposed by the system.
    SystemRecommendation,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManualSelection => "manual_selection",
            Self::SystemRecommendation => "system_recommendation",
        }
    }
}

/// Trust flag on a manufacturer profile, set by the onboarding review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the stored label. Unknown labels are treated as unverified.
    pub fn parse(label: &str) -> Self {
        match label {
            "verified" => Self::Verified,
            "pending" => Self::Pending,
            "rejected" => Self::Rejected,
            _ => Self::Unverified,
        }
    }

    pub fn is_verified(self) -> bool {
        self == Self::Verified
    }
}

/// A category a manufacturer claims to produce, with optional subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub category: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Normalise a category for comparison: trimmed, ASCII lowercase.
///
/// Returns `None` for blank input so callers can tell "no category" apart.
pub fn normalize_category(category: &str) -> Option<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}

pub fn categories_match(a: &str, b: &str) -> bool {
    match (normalize_category(a), normalize_category(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Whether any capability covers `category`.
pub fn capabilities_cover(capabilities: &[Capability], category: &str) -> bool {
    capabilities
        .iter()
        .any(|c| categories_match(&c.category, category))
}

pub fn category_reason(category: &str) -> String {
    format!("Matches category: {}", category.trim())
}

/// Score and reason for a manufacturer returned by the brief-side query.
///
/// `category` is the filter that was applied, if any; every manufacturer
/// the query returned has already passed it.
pub fn manufacturer_score(category: Option<&str>) -> (i32, String) {
    match category.filter(|c| normalize_category(c).is_some()) {
        Some(c) => (CATEGORY_MATCH_SCORE, category_reason(c)),
        None => (VERIFIED_BASELINE_SCORE, VERIFIED_REASON.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(category: &str) -> Capability {
        Capability {
            category: category.to_string(),
            subcategories: Vec::new(),
        }
    }

    #[test]
    fn category_filter_scores_full_marks_with_reason() {
        let (score, reason) = manufacturer_score(Some("Apparel"));
        assert_eq!(score, 100);
        assert!(reason.contains("Apparel"));
    }

    #[test]
    fn missing_or_blank_category_scores_baseline() {
        assert_eq!(manufacturer_score(None), (50, "Verified manufacturer".to_string()));
        assert_eq!(manufacturer_score(Some("  ")).0, 50);
    }

    #[test]
    fn category_comparison_ignores_case_and_padding() {
        assert!(categories_match("Apparel", " apparel "));
        assert!(!categories_match("Apparel", "Footwear"));
        assert!(!categories_match("", ""));
    }

    #[test]
    fn capability_coverage() {
        let caps = vec![cap("Footwear"), cap("Apparel")];
        assert!(capabilities_cover(&caps, "APPAREL"));
        assert!(!capabilities_cover(&caps, "Cosmetics"));
        assert!(!capabilities_cover(&[], "Apparel"));
    }

    #[test]
    fn verification_labels() {
        assert!(VerificationStatus::parse("verified").is_verified());
        assert_eq!(VerificationStatus::parse("bogus"), VerificationStatus::Unverified);
        assert_eq!(VerificationStatus::Pending.as_str(), "pending");
    }

    #[test]
    fn match_type_labels() {
        assert_eq!(MatchType::ManualSelection.as_str(), "manual_selection");
        let json = serde_json::to_string(&MatchType::SystemRecommendation).unwrap();
        assert_eq!(json, "\"system_recommendation\"");
    }
}
