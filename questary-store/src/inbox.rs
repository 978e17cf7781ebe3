//! Inbox operations: received questionnaires and their answers.

use crate::DocumentStore;
use chrono::Utc;
use questary_core::{
    EntityId, Notification, NotificationKind, QuestaryResult, ReceivedQuestionnaire,
    ReceivedStatus, StoreError,
};

impl DocumentStore {
    /// All questionnaires received through redeemed friend codes.
    pub async fn received_questionnaires(&self) -> QuestaryResult<Vec<ReceivedQuestionnaire>> {
        self.read(|document| document.received_questionnaires.clone())
            .await
    }

    /// One inbox entry by id.
    pub async fn received_questionnaire(
        &self,
        id: EntityId,
    ) -> QuestaryResult<ReceivedQuestionnaire> {
        self.read(|document| {
            document
                .received_questionnaires
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or(StoreError::ReceivedNotFound { id })
        })
        .await?
        .map_err(Into::into)
    }

    /// Store draft answers without submitting; the entry moves to
    /// `InProgress` and answers are kept as typed.
    pub async fn save_draft(
        &self,
        id: EntityId,
        answers: Vec<String>,
    ) -> QuestaryResult<ReceivedQuestionnaire> {
        self.mutate(|_, document| {
            let received = document
                .received_questionnaires
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::ReceivedNotFound { id })?;
            received.answers = answers;
            received.status = ReceivedStatus::InProgress;
            Ok(received.clone())
        })
        .await
    }

    /// Submit final answers: trims them, completes the entry, and notifies
    /// the sender side in the same save.
    pub async fn submit_answers(
        &self,
        id: EntityId,
        answers: Vec<String>,
    ) -> QuestaryResult<ReceivedQuestionnaire> {
        self.mutate(|_, document| {
            let owner_name = document.profile.name.clone();
            let received = document
                .received_questionnaires
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::ReceivedNotFound { id })?;
            received.answers = answers.into_iter().map(|a| a.trim().to_string()).collect();
            received.status = ReceivedStatus::Completed;
            received.completed_at = Some(Utc::now());
            tracing::debug!(%id, "answers submitted");

            let submitted = received.clone();
            let notification = Notification::new(
                NotificationKind::QuestionnaireCompleted,
                &format!("{} completed your questionnaire!", owner_name),
                submitted.from_user_id.clone(),
            );
            document.notifications.push(notification);
            Ok(submitted)
        })
        .await
    }

    /// Reopen a submitted entry for editing. Answers stay; the entry moves
    /// back to `InProgress`.
    pub async fn reopen_submission(
        &self,
        id: EntityId,
    ) -> QuestaryResult<ReceivedQuestionnaire> {
        self.mutate(|_, document| {
            let received = document
                .received_questionnaires
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::ReceivedNotFound { id })?;
            received.status = ReceivedStatus::InProgress;
            Ok(received.clone())
        })
        .await
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use questary_client::MockRemoteApi;
    use questary_core::{new_entity_id, ProfileUpdate, QuestaryError, StoreConfig};
    use std::sync::Arc;

    /// Store with one redeemed questionnaire sitting in the inbox.
    async fn store_with_inbox() -> (DocumentStore, EntityId) {
        let api = Arc::new(MockRemoteApi::new("user-1"));
        let store = DocumentStore::new(api, StoreConfig::default()).unwrap();
        store.initialize().await.unwrap();
        store
            .update_profile(ProfileUpdate {
                name: Some("Grace".to_string()),
            })
            .await
            .unwrap();
        let q = store
            .create_questionnaire("Q", vec!["a".into(), "b".into()])
            .await
            .unwrap();
        let friend = store.add_friend("Ada", "", q.id).await.unwrap();
        let received = store.redeem_friend_code(&friend.friend_code).await.unwrap();
        (store, received.id)
    }

    #[tokio::test]
    async fn test_save_draft_keeps_raw_answers() {
        let (store, id) = store_with_inbox().await;
        let draft = store
            .save_draft(id, vec![" blue ".into(), String::new()])
            .await
            .unwrap();
        assert_eq!(draft.status, ReceivedStatus::InProgress);
        assert_eq!(draft.answers, vec![" blue ", ""]);
        assert!(draft.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_submit_trims_and_completes() {
        let (store, id) = store_with_inbox().await;
        let submitted = store
            .submit_answers(id, vec![" blue ".into(), "pasta".into()])
            .await
            .unwrap();
        assert_eq!(submitted.status, ReceivedStatus::Completed);
        assert_eq!(submitted.answers, vec!["blue", "pasta"]);
        assert!(submitted.completed_at.is_some());

        // The sender-side notification rides the same document.
        let document = store.get().await.unwrap();
        let completed: Vec<_> = document
            .notifications
            .iter()
            .filter(|n| n.kind == NotificationKind::QuestionnaireCompleted)
            .collect();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].message.starts_with("Grace "));
        assert_eq!(completed[0].related_id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_reopen_returns_to_in_progress() {
        let (store, id) = store_with_inbox().await;
        store
            .submit_answers(id, vec!["x".into(), "y".into()])
            .await
            .unwrap();

        let reopened = store.reopen_submission(id).await.unwrap();
        assert_eq!(reopened.status, ReceivedStatus::InProgress);
        assert_eq!(reopened.answers, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_unknown_inbox_entry() {
        let (store, _) = store_with_inbox().await;
        let err = store
            .save_draft(new_entity_id(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuestaryError::Store(StoreError::ReceivedNotFound { .. })
        ));
    }
}
