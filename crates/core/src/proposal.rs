//! Proposal terms submitted by a manufacturer against a brief.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::brief::{validate_currency, validate_not_blank, DEFAULT_CURRENCY};

/// Structured, known fields of a proposal's details block.
///
/// `notes` is the free-form part; the rest are fields the brand-side
/// comparison view relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProposalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "minimum order quantity must be at least 1"))]
    pub minimum_order_quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
}

/// What a manufacturer offers when submitting a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProposalTerms {
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than zero"))]
    pub price: f64,
    #[serde(default = "default_currency")]
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub delivery_timeline: String,
    #[serde(default)]
    pub target_delivery_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(nested)]
    pub details: ProposalDetails,
    /// Opaque references owned by the file storage service.
    #[serde(default)]
    pub attachments: Vec<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> ProposalTerms {
        ProposalTerms {
            price: 2000.0,
            currency: "USD".to_string(),
            delivery_timeline: "2 weeks".to_string(),
            target_delivery_date: None,
            details: ProposalDetails::default(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn valid_terms_pass() {
        assert!(terms().validate().is_ok());
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut t = terms();
        t.price = 0.0;
        let err = t.validate().unwrap_err().to_string();
        assert!(err.contains("price"), "{err}");
    }

    #[test]
    fn blank_timeline_is_rejected() {
        let mut t = terms();
        t.delivery_timeline = " ".to_string();
        assert!(t.validate().is_err());
    }

    #[test]
    fn nested_minimum_order_quantity_is_checked() {
        let mut t = terms();
        t.details.minimum_order_quantity = Some(0);
        assert!(t.validate().is_err());
        t.details.minimum_order_quantity = Some(100);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn minimal_json_body_fills_defaults() {
        let t: ProposalTerms = serde_json::from_value(serde_json::json!({
            "price": 2000,
            "delivery_timeline": "2 weeks"
        }))
        .unwrap();
        assert_eq!(t.currency, "USD");
        assert!(t.attachments.is_empty());
        assert_eq!(t.details, ProposalDetails::default());
    }
}
