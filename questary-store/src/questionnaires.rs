//! Questionnaire operations.

use crate::DocumentStore;
use chrono::Utc;
use questary_core::{
    EntityId, Questionnaire, QuestionnaireUpdate, QuestaryResult, StoreError,
};

impl DocumentStore {
    /// All questionnaires authored by this user.
    pub async fn questionnaires(&self) -> QuestaryResult<Vec<Questionnaire>> {
        self.read(|document| document.questionnaires.clone()).await
    }

    /// One questionnaire by id.
    pub async fn questionnaire(&self, id: EntityId) -> QuestaryResult<Questionnaire> {
        self.read(|document| {
            document
                .questionnaires
                .iter()
                .find(|q| q.id == id)
                .cloned()
                .ok_or(StoreError::QuestionnaireNotFound { id })
        })
        .await?
        .map_err(Into::into)
    }

    /// Create a questionnaire and save.
    pub async fn create_questionnaire(
        &self,
        title: &str,
        questions: Vec<String>,
    ) -> QuestaryResult<Questionnaire> {
        self.mutate(|_, document| {
            let questionnaire = Questionnaire::new(title, questions);
            tracing::debug!(id = %questionnaire.id, "creating questionnaire");
            document.questionnaires.push(questionnaire.clone());
            Ok(questionnaire)
        })
        .await
    }

    /// Apply a partial update, stamp `updated_at`, and save.
    pub async fn update_questionnaire(
        &self,
        id: EntityId,
        update: QuestionnaireUpdate,
    ) -> QuestaryResult<Questionnaire> {
        self.mutate(|_, document| {
            let questionnaire = document
                .questionnaires
                .iter_mut()
                .find(|q| q.id == id)
                .ok_or(StoreError::QuestionnaireNotFound { id })?;
            if let Some(title) = update.title {
                questionnaire.title = title.trim().to_string();
            }
            if let Some(questions) = update.questions {
                questionnaire.questions = questions
                    .into_iter()
                    .map(|q| q.trim().to_string())
                    .filter(|q| !q.is_empty())
                    .collect();
            }
            questionnaire.updated_at = Utc::now();
            Ok(questionnaire.clone())
        })
        .await
    }

    /// Remove a questionnaire and save.
    pub async fn delete_questionnaire(&self, id: EntityId) -> QuestaryResult<()> {
        self.mutate(|_, document| {
            let index = document
                .questionnaires
                .iter()
                .position(|q| q.id == id)
                .ok_or(StoreError::QuestionnaireNotFound { id })?;
            document.questionnaires.remove(index);
            tracing::debug!(%id, "questionnaire deleted");
            Ok(())
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
    use questary_client::{MockRemoteApi, RemoteOp};
    use questary_core::{new_entity_id, QuestaryError, StoreConfig};
    use std::sync::Arc;

    async fn ready_store() -> (Arc<MockRemoteApi>, DocumentStore) {
        let api = Arc::new(MockRemoteApi::new("user-1"));
        let store = DocumentStore::new(api.clone(), StoreConfig::default()).unwrap();
        store.initialize().await.unwrap();
        (api, store)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (api, store) = ready_store().await;
        let created = store
            .create_questionnaire("Favorites", vec!["Color?".into(), "Food?".into()])
            .await
            .unwrap();

        let all = store.questionnaires().await.unwrap();
        assert_eq!(all, vec![created]);
        assert_eq!(api.call_count(RemoteOp::MemoryReplace), 1);
    }

    #[tokio::test]
    async fn test_lookup_missing_id() {
        let (_, store) = ready_store().await;
        let id = new_entity_id();
        let err = store.questionnaire(id).await.unwrap_err();
        assert!(matches!(
            err,
            QuestaryError::Store(StoreError::QuestionnaireNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at() {
        let (_, store) = ready_store().await;
        let created = store
            .create_questionnaire("Old", vec!["q".into()])
            .await
            .unwrap();

        let updated = store
            .update_questionnaire(
                created.id,
                QuestionnaireUpdate {
                    title: Some("New".into()),
                    questions: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.questions, created.questions);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_does_not_save() {
        let (api, store) = ready_store().await;
        let before = api.call_count(RemoteOp::MemoryReplace);

        let err = store
            .update_questionnaire(new_entity_id(), QuestionnaireUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuestaryError::Store(StoreError::QuestionnaireNotFound { .. })
        ));
        assert_eq!(api.call_count(RemoteOp::MemoryReplace), before);
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let (_, store) = ready_store().await;
        let created = store
            .create_questionnaire("Gone", vec!["q".into()])
            .await
            .unwrap();

        store.delete_questionnaire(created.id).await.unwrap();
        assert!(store.questionnaires().await.unwrap().is_empty());
    }
}
