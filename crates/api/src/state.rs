use std::sync::Arc;

use brieflink_events::EventBus;
use brieflink_workflow::Workflow;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the workflow services hold their dependencies behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Engagement services over the configured record store.
    pub workflow: Workflow,
    /// Bus the notification emitter publishes to; background consumers
    /// subscribe here.
    pub event_bus: Arc<EventBus>,
}
