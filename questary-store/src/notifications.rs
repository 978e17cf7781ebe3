//! Notification operations.

use crate::DocumentStore;
use questary_core::{
    EntityId, Notification, NotificationKind, QuestaryResult, StoreError,
};

impl DocumentStore {
    /// All notifications, newest last.
    pub async fn notifications(&self) -> QuestaryResult<Vec<Notification>> {
        self.read(|document| document.notifications.clone()).await
    }

    /// Count of unread notifications.
    pub async fn unread_notifications(&self) -> QuestaryResult<usize> {
        self.read(|document| document.notifications.iter().filter(|n| !n.read).count())
            .await
    }

    /// Append an unread notification and save.
    pub async fn create_notification(
        &self,
        kind: NotificationKind,
        message: &str,
        related_id: Option<String>,
    ) -> QuestaryResult<Notification> {
        self.mutate(|_, document| {
            let notification = Notification::new(kind, message, related_id);
            document.notifications.push(notification.clone());
            Ok(notification)
        })
        .await
    }

    /// Mark one notification read and save.
    pub async fn mark_notification_read(&self, id: EntityId) -> QuestaryResult<()> {
        self.mutate(|_, document| {
            let notification = document
                .notifications
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or(StoreError::NotificationNotFound { id })?;
            notification.read = true;
            Ok(())
        })
        .await
    }

    /// Mark every notification read and save.
    pub async fn mark_all_notifications_read(&self) -> QuestaryResult<()> {
        self.mutate(|_, document| {
            for notification in &mut document.notifications {
                notification.read = true;
            }
            Ok(())
        })
        .await
    }

    /// Remove a notification and save.
    pub async fn delete_notification(&self, id: EntityId) -> QuestaryResult<()> {
        self.mutate(|_, document| {
            let index = document
                .notifications
                .iter()
                .position(|n| n.id == id)
                .ok_or(StoreError::NotificationNotFound { id })?;
            document.notifications.remove(index);
            Ok(())
        })
        .await
    }
}

// =============================================================================
// TESTS
// =============================================================================
