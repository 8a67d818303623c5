//! Logs every engagement event.
//!
//! Push delivery lives outside this system. The notification row is already
//! stored by the time an event is published, so this loop only records that
//! the event went out.

use tokio::sync::broadcast;

use crate::bus::EngagementEvent;

/// Background subscriber that logs engagement events.
pub struct EventTracer;

impl EventTracer {
    /// Run until the bus is dropped. Returns the number of events seen.
    pub async fn run(mut receiver: broadcast::Receiver<EngagementEvent>) -> u64 {
        let mut seen = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    seen += 1;
                    tracing::info!(
                        event_type = %event.event_type,
                        recipient_actor_id = event.recipient_actor_id,
                        notification_id = ?event.notification_id,
                        "Engagement event published"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event tracer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, tracer shutting down");
                    break;
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use brieflink_core::notification::NotificationType;

    use super::*;
    use crate::bus::EventBus;

    #[tokio::test]
    async fn tracer_drains_until_the_bus_closes() {
        let bus = EventBus::default();
        let rx = bus.subscribe();
        bus.publish(EngagementEvent::new(NotificationType::ProposalReceived, 1));
        bus.publish(EngagementEvent::new(NotificationType::ProposalRejected, 2));
        drop(bus);

        assert_eq!(EventTracer::run(rx).await, 2);
    }
}
