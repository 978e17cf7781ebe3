//! Friend and friend-code operations.

use crate::DocumentStore;
use chrono::Utc;
use questary_core::{
    EntityId, Friend, FriendStatus, Notification, NotificationKind, QuestaryResult,
    ReceivedQuestionnaire, StoreError,
};

impl DocumentStore {
    /// All friend entries.
    pub async fn friends(&self) -> QuestaryResult<Vec<Friend>> {
        self.read(|document| document.friends.clone()).await
    }

    /// One friend entry by id.
    pub async fn friend(&self, id: EntityId) -> QuestaryResult<Friend> {
        self.read(|document| {
            document
                .friends
                .iter()
                .find(|f| f.id == id)
                .cloned()
                .ok_or(StoreError::FriendNotFound { id })
        })
        .await?
        .map_err(Into::into)
    }

    /// Add a friend with a fresh shareable code, assigned one of our
    /// questionnaires, and save.
    pub async fn add_friend(
        &self,
        name: &str,
        email: &str,
        questionnaire_id: EntityId,
    ) -> QuestaryResult<Friend> {
        self.mutate(|_, document| {
            if !document.questionnaires.iter().any(|q| q.id == questionnaire_id) {
                return Err(StoreError::QuestionnaireNotFound {
                    id: questionnaire_id,
                }
                .into());
            }
            let friend = Friend::new(name, email, questionnaire_id);
            tracing::debug!(id = %friend.id, code = %friend.friend_code, "friend added");
            document.friends.push(friend.clone());
            Ok(friend)
        })
        .await
    }

    /// Redeem a friend code: stamp the redeeming user on the friend entry,
    /// materialize the assigned questionnaire in the inbox, and notify —
    /// one save for the whole exchange.
    pub async fn redeem_friend_code(&self, code: &str) -> QuestaryResult<ReceivedQuestionnaire> {
        self.mutate(|user_id, document| {
            let friend_idx = document
                .friends
                .iter()
                .position(|f| f.friend_code == code)
                .ok_or_else(|| StoreError::InvalidFriendCode {
                    code: code.to_string(),
                })?;

            let assigned = document.friends[friend_idx].assigned_questionnaire;
            let questionnaire = document
                .questionnaires
                .iter()
                .find(|q| q.id == assigned)
                .cloned()
                .ok_or(StoreError::QuestionnaireNotFound { id: assigned })?;

            let friend = &mut document.friends[friend_idx];
            friend.user_id = Some(user_id.clone());
            friend.status = FriendStatus::Received;

            let received = ReceivedQuestionnaire::from_assignment(friend, &questionnaire);
            let notification = Notification::new(
                NotificationKind::QuestionnaireReceived,
                &format!(
                    "{} sent you a questionnaire: \"{}\"",
                    friend.name, questionnaire.title
                ),
                Some(received.id.to_string()),
            );
            tracing::debug!(%code, received = %received.id, "friend code redeemed");

            document.received_questionnaires.push(received.clone());
            document.notifications.push(notification);
            Ok(received)
        })
        .await
    }

    /// Mark a friend's exchange as completed and save.
    pub async fn mark_friend_completed(&self, id: EntityId) -> QuestaryResult<Friend> {
        self.mutate(|_, document| {
            let friend = document
                .friends
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or(StoreError::FriendNotFound { id })?;
            friend.status = FriendStatus::Completed;
            friend.completed_at = Some(Utc::now());
            Ok(friend.clone())
        })
        .await
    }
}

// =============================================================================
// TESTS
// =============================================================================
