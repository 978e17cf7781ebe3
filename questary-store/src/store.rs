//! The document store: one cached document per user, replaced wholesale on
//! every save.

use questary_client::RemoteApi;
use questary_core::{
    memory_key, ApiError, Document, Profile, ProfileUpdate, QuestaryResult, StoreConfig,
    StoreError, UserId, UserStats,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session state once initialization has succeeded.
pub(crate) struct Session {
    pub(crate) user_id: UserId,
    pub(crate) key: String,
    pub(crate) document: Document,
}

/// Owns the single in-memory document and mediates every remote read/write.
///
/// The session mutex doubles as the per-document critical section: every
/// mutate-then-save operation holds it from first read until the remote
/// replace resolves, so interleaved mutators serialize instead of racing.
/// Across separate sessions the remote store still behaves last-write-wins.
pub struct DocumentStore {
    api: Arc<dyn RemoteApi>,
    namespace: String,
    session: Mutex<Option<Session>>,
}

impl DocumentStore {
    /// Create an uninitialized store over a remote API.
    pub fn new(api: Arc<dyn RemoteApi>, config: StoreConfig) -> QuestaryResult<Self> {
        config.validate()?;
        Ok(Self {
            api,
            namespace: config.namespace,
            session: Mutex::new(None),
        })
    }

    /// Resolve the user, fetch their document, and cache it.
    ///
    /// An absent remote document is a legitimate first-run signal: a default
    /// empty document is synthesized and persisted with one create call
    /// before this returns. Any other failure propagates and leaves the
    /// store uninitialized. Calling this on an initialized store re-runs the
    /// sequence and replaces the session.
    pub async fn initialize(&self) -> QuestaryResult<Document> {
        let mut guard = self.session.lock().await;

        let user = self.api.fetch_identity().await?;
        let key = memory_key(&self.namespace, &user.id);
        tracing::debug!(user_id = %user.id, %key, "initializing document store");

        let document = match self.api.memory_get(&key).await? {
            Some(value) => decode(value)?,
            None => {
                tracing::info!(%key, "no stored document, creating default");
                let document = Document::empty(user.id.clone());
                self.api.memory_create(&key, encode(&document)?).await?;
                document
            }
        };

        *guard = Some(Session {
            user_id: user.id,
            key,
            document: document.clone(),
        });
        Ok(document)
    }

    /// Whether `initialize` has completed successfully.
    pub async fn is_initialized(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// The cached document. Never re-fetches.
    pub async fn get(&self) -> QuestaryResult<Document> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(StoreError::NotInitialized)?;
        Ok(session.document.clone())
    }

    /// Push the cached document to the remote store as a full replace.
    pub async fn save(&self) -> QuestaryResult<()> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(StoreError::NotInitialized)?;
        self.push(session).await
    }

    /// Delete the remote document and return the store to its
    /// uninitialized state.
    pub async fn delete(&self) -> QuestaryResult<()> {
        let mut guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(StoreError::NotInitialized)?;
        self.api.memory_delete(&session.key).await?;
        tracing::info!(key = %session.key, "remote document deleted");
        *guard = None;
        Ok(())
    }

    /// Merge profile fields and save.
    pub async fn update_profile(&self, update: ProfileUpdate) -> QuestaryResult<Profile> {
        self.mutate(|_, document| {
            if let Some(name) = update.name {
                document.profile.name = name.trim().to_string();
            }
            Ok(document.profile.clone())
        })
        .await
    }

    /// Whether the cached profile carries a name.
    pub async fn is_profile_complete(&self) -> QuestaryResult<bool> {
        self.read(|document| document.is_profile_complete()).await
    }

    /// Dashboard counters over the cached document.
    pub async fn user_stats(&self) -> QuestaryResult<UserStats> {
        self.read(|document| document.stats()).await
    }

    /// Run a read-only closure against the cached document.
    pub(crate) async fn read<T>(
        &self,
        f: impl FnOnce(&Document) -> T,
    ) -> QuestaryResult<T> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(StoreError::NotInitialized)?;
        Ok(f(&session.document))
    }

    /// Run a mutating closure and save, all inside the critical section.
    ///
    /// A closure error aborts before any remote call; a failed save leaves
    /// the in-memory document ahead of the remote copy, to be reconciled by
    /// the next successful save.
    pub(crate) async fn mutate<T>(
        &self,
        f: impl FnOnce(&UserId, &mut Document) -> QuestaryResult<T>,
    ) -> QuestaryResult<T> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(StoreError::NotInitialized)?;
        let out = f(&session.user_id, &mut session.document)?;
        self.push(session).await?;
        Ok(out)
    }

    async fn push(&self, session: &Session) -> QuestaryResult<()> {
        tracing::debug!(key = %session.key, "saving document");
        self.api
            .memory_replace(&session.key, encode(&session.document)?)
            .await?;
        Ok(())
    }
}

fn encode(document: &Document) -> QuestaryResult<Value> {
    serde_json::to_value(document).map_err(|e| {
        ApiError::InvalidResponse {
            reason: format!("document encode failed: {}", e),
        }
        .into()
    })
}

fn decode(value: Value) -> QuestaryResult<Document> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::InvalidResponse {
            reason: format!("document decode failed: {}", e),
        }
        .into()
    })
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("namespace", &self.namespace)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
