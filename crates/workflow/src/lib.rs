//! Engagement workflow services.
//!
//! Every service talks to persistence through [`RecordStore`] and to the
//! onboarding-owned profiles through [`ProfileDirectory`], so the same code
//! runs against Postgres ([`pg`]) and the in-memory doubles ([`memory`]).
//!
//! [`Workflow`] wires the services together and is what the HTTP layer
//! holds in its state.

use std::sync::Arc;

use brieflink_core::error::CoreError;
use brieflink_core::types::DbId;
use brieflink_events::EventBus;

pub mod briefs;
pub mod config;
pub mod execution_log;
pub mod matching;
pub mod memory;
pub mod notifier;
pub mod orchestrator;
pub mod pg;
pub mod proposals;
pub mod store;
pub mod views;

pub use briefs::BriefLifecycle;
pub use config::WorkflowConfig;
pub use execution_log::ExecutionLog;
pub use matching::MatchingEngine;
pub use notifier::NotificationEmitter;
pub use orchestrator::{AcceptanceOrchestrator, CascadeReport, CascadeStep};
pub use proposals::ProposalLifecycle;
pub use store::{ProfileDirectory, RecordStore, StoreError};

/// The caller's side of an engagement, by profile ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Brand(DbId),
    Manufacturer(DbId),
}

/// All workflow services, sharing one store, directory and event bus.
#[derive(Clone)]
pub struct Workflow {
    pub briefs: BriefLifecycle,
    pub proposals: ProposalLifecycle,
    pub matching: MatchingEngine,
    pub notifications: NotificationEmitter,
    pub execution_log: ExecutionLog,
    store: Arc<dyn RecordStore>,
    directory: Arc<dyn ProfileDirectory>,
}

impl Workflow {
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn ProfileDirectory>,
        event_bus: Arc<EventBus>,
        config: WorkflowConfig,
    ) -> Self {
        let notifications = NotificationEmitter::new(Arc::clone(&store), event_bus);
        let execution_log = ExecutionLog::new(Arc::clone(&store), Arc::clone(&directory));
        let orchestrator = AcceptanceOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&directory),
            notifications.clone(),
            execution_log.clone(),
            config.close_sibling_proposals,
        );
        Self {
            briefs: BriefLifecycle::new(
                Arc::clone(&store),
                Arc::clone(&directory),
                notifications.clone(),
                execution_log.clone(),
            ),
            proposals: ProposalLifecycle::new(
                Arc::clone(&store),
                Arc::clone(&directory),
                notifications.clone(),
                orchestrator,
            ),
            matching: MatchingEngine::new(
                Arc::clone(&store),
                Arc::clone(&directory),
                config.recommendation_window,
            ),
            notifications,
            execution_log,
            store,
            directory,
        }
    }

    /// Whether the backing store answers.
    pub async fn store_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Record store health check failed");
                false
            }
        }
    }

    /// The brand profile owned by `actor_id`, keyed by actor in `NotFound`.
    pub async fn brand_profile_id(&self, actor_id: DbId) -> Result<DbId, CoreError> {
        self.directory
            .brand_for_actor(actor_id)
            .await?
            .map(|p| p.id)
            .ok_or(CoreError::NotFound {
                entity: "BrandProfile",
                id: actor_id,
            })
    }

    /// The manufacturer profile owned by `actor_id`.
    pub async fn manufacturer_profile_id(&self, actor_id: DbId) -> Result<DbId, CoreError> {
        self.directory
            .manufacturer_for_actor(actor_id)
            .await?
            .map(|p| p.id)
            .ok_or(CoreError::NotFound {
                entity: "ManufacturerProfile",
                id: actor_id,
            })
    }
}
