//! Shared fixtures for the workflow integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use brieflink_core::brief::{BriefFields, BriefRequirements, Budget};
use brieflink_core::matching::VerificationStatus;
use brieflink_core::proposal::{ProposalDetails, ProposalTerms};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::Brief;
use brieflink_db::models::profile::{BrandProfile, ManufacturerProfile};
use brieflink_events::EventBus;
use brieflink_workflow::memory::{InMemoryDirectory, InMemoryStore};
use brieflink_workflow::{ProfileDirectory, RecordStore, Workflow, WorkflowConfig};

/// Actor IDs used by the default fixture.
pub const BRAND_ACTOR: DbId = 100;
pub const M1_ACTOR: DbId = 201;
pub const M2_ACTOR: DbId = 202;
pub const UNVERIFIED_ACTOR: DbId = 203;
pub const FOOTWEAR_ACTOR: DbId = 204;

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub directory: Arc<InMemoryDirectory>,
    pub bus: Arc<EventBus>,
    pub workflow: Workflow,
    pub brand: BrandProfile,
    /// Verified, Apparel.
    pub m1: ManufacturerProfile,
    /// Verified, Apparel.
    pub m2: ManufacturerProfile,
    /// Unverified, Apparel.
    pub unverified: ManufacturerProfile,
    /// Verified, Footwear only.
    pub footwear: ManufacturerProfile,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(WorkflowConfig::default())
    }

    pub fn with_config(config: WorkflowConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let bus = Arc::new(EventBus::default());

        let brand = directory.add_brand(BRAND_ACTOR, "Acme Apparel Co");
        let m1 = directory.add_manufacturer(
            M1_ACTOR,
            "Northside Mills",
            VerificationStatus::Verified,
            &["Apparel"],
        );
        let m2 = directory.add_manufacturer(
            M2_ACTOR,
            "Harbor Textiles",
            VerificationStatus::Verified,
            &["apparel"],
        );
        let unverified = directory.add_manufacturer(
            UNVERIFIED_ACTOR,
            "Fresh Start Sewing",
            VerificationStatus::Pending,
            &["Apparel"],
        );
        let footwear = directory.add_manufacturer(
            FOOTWEAR_ACTOR,
            "Sole Works",
            VerificationStatus::Verified,
            &["Footwear"],
        );

        let workflow = Workflow::new(
            Arc::clone(&store) as Arc<dyn RecordStore>,
            Arc::clone(&directory) as Arc<dyn ProfileDirectory>,
            Arc::clone(&bus),
            config,
        );

        Self {
            store,
            directory,
            bus,
            workflow,
            brand,
            m1,
            m2,
            unverified,
            footwear,
        }
    }

    pub async fn draft_brief(&self) -> Brief {
        self.workflow
            .briefs
            .create(self.brand.id, brief_fields("Apparel"))
            .await
            .expect("create brief")
    }

    pub async fn open_brief(&self) -> Brief {
        let draft = self.draft_brief().await;
        self.workflow
            .briefs
            .publish(draft.id, self.brand.id)
            .await
            .expect("publish brief")
    }
}

pub fn brief_fields(category: &str) -> BriefFields {
    BriefFields {
        title: "Organic cotton tees".to_string(),
        description: "Heavyweight crew-neck tees in three colours".to_string(),
        requirements: BriefRequirements {
            product_type: "T-shirt".to_string(),
            quantity: 500,
            specifications: vec!["220gsm".to_string()],
            quality_standards: None,
            packaging_notes: None,
        },
        budget: Budget {
            min: 1000.0,
            max: 5000.0,
        },
        currency: "USD".to_string(),
        category: category.to_string(),
        timeline: "6 weeks".to_string(),
        ai_generated: false,
    }
}

pub fn terms(price: f64) -> ProposalTerms {
    ProposalTerms {
        price,
        currency: "USD".to_string(),
        delivery_timeline: "2 weeks".to_string(),
        target_delivery_date: None,
        details: ProposalDetails::default(),
        attachments: Vec::new(),
    }
}
