//! Notification emission and the recipient's inbox.

use std::sync::Arc;

use brieflink_core::error::CoreError;
use brieflink_core::notification::NotificationContent;
use brieflink_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use brieflink_core::types::DbId;
use brieflink_db::models::notification::{CreateNotification, Notification};
use brieflink_events::{EngagementEvent, EventBus};

use crate::store::RecordStore;

#[derive(Clone)]
pub struct NotificationEmitter {
    store: Arc<dyn RecordStore>,
    event_bus: Arc<EventBus>,
}

impl NotificationEmitter {
    pub fn new(store: Arc<dyn RecordStore>, event_bus: Arc<EventBus>) -> Self {
        Self { store, event_bus }
    }

    /// Store a notification for `recipient_actor_id` and publish it.
    ///
    /// Never fails: a store error is logged and reported as `None`.
    pub async fn emit(
        &self,
        recipient_actor_id: DbId,
        content: NotificationContent,
    ) -> Option<Notification> {
        let kind = content.notification_type;
        let input = CreateNotification {
            recipient_actor_id,
            notification_type: kind,
            title: content.title,
            message: content.message,
            data: content.data,
        };
        match self.store.insert_notification(input).await {
            Ok(notification) => {
                self.event_bus.publish(
                    EngagementEvent::new(kind, recipient_actor_id)
                        .with_notification(notification.id)
                        .with_payload(notification.data.clone()),
                );
                tracing::debug!(
                    notification_id = notification.id,
                    recipient_actor_id,
                    notification_type = %kind,
                    "Notification emitted"
                );
                Some(notification)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    recipient_actor_id,
                    notification_type = %kind,
                    "Failed to store notification"
                );
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Inbox
    // -----------------------------------------------------------------------

    pub async fn list(
        &self,
        recipient_actor_id: DbId,
        unread_only: bool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Notification>, CoreError> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        Ok(self
            .store
            .list_notifications(recipient_actor_id, unread_only, limit, offset)
            .await?)
    }

    /// Mark one notification read. Someone else's notification is `NotFound`.
    pub async fn mark_read(
        &self,
        recipient_actor_id: DbId,
        id: DbId,
    ) -> Result<Notification, CoreError> {
        self.store
            .mark_notification_read(recipient_actor_id, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Notification",
                id,
            })
    }

    pub async fn mark_all_read(&self, recipient_actor_id: DbId) -> Result<u64, CoreError> {
        let updated = self
            .store
            .mark_all_notifications_read(recipient_actor_id)
            .await?;
        tracing::info!(recipient_actor_id, updated, "Notifications marked read");
        Ok(updated)
    }

    pub async fn unread_count(&self, recipient_actor_id: DbId) -> Result<i64, CoreError> {
        Ok(self.store.unread_notification_count(recipient_actor_id).await?)
    }
}
