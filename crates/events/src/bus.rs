//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the workflow services
//! (publishers) and whatever delivery mechanism subscribes.

use brieflink_core::notification::NotificationType;
use brieflink_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// EngagementEvent
// ---------------------------------------------------------------------------

/// Something a party should hear about, published after the matching
/// notification row has been stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementEvent {
    /// Dot-separated event name, e.g. `"proposal.accepted"`.
    pub event_type: String,

    /// Actor the event is addressed to.
    pub recipient_actor_id: DbId,

    /// ID of the stored notification, when one was written.
    pub notification_id: Option<DbId>,

    /// Deep-link payload, `{brief_id, proposal_id}` for proposal events.
    pub payload: serde_json::Value,

    pub timestamp: Timestamp,
}

impl EngagementEvent {
    pub fn new(kind: NotificationType, recipient_actor_id: DbId) -> Self {
        Self {
            event_type: kind.event_name().to_string(),
            recipient_actor_id,
            notification_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_notification(mut self, notification_id: DbId) -> Self {
        self.notification_id = Some(notification_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use brieflink_core::notification::NotificationType;
/// use brieflink_events::bus::{EngagementEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(EngagementEvent::new(NotificationType::ProposalReceived, 7));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<EngagementEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns how many subscribers received it; zero is not an error.
    pub fn publish(&self, event: EngagementEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngagementEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
