//! In-memory mock of the remote API for tests.
//!
//! Records every call in a journal so tests can assert interaction counts
//! and order, and supports per-operation failure injection.

use crate::{RemoteApi, UserInfo};
use async_trait::async_trait;
use questary_core::{ApiError, ApiResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Kind of remote operation, used for journal queries and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    ValidateCredential,
    FetchIdentity,
    MemoryGet,
    MemoryCreate,
    MemoryReplace,
    MemoryDelete,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub op: RemoteOp,
    /// Memory key for document operations, `None` otherwise.
    pub key: Option<String>,
    /// Serialized body for create/replace, so tests can inspect exactly
    /// what would have gone over the wire.
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    memories: HashMap<String, Value>,
    journal: Vec<RecordedCall>,
    failures: HashMap<RemoteOp, ApiError>,
}

/// In-memory [`RemoteApi`] backend.
pub struct MockRemoteApi {
    identity: UserInfo,
    state: Mutex<MockState>,
}

impl MockRemoteApi {
    /// Create a backend that authenticates as `user_id` and holds no
    /// documents.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            identity: UserInfo {
                id: user_id.into(),
                name: None,
                email: None,
            },
            state: Mutex::new(MockState::default()),
        }
    }

    /// Seed a stored document.
    pub fn with_memory(self, key: impl Into<String>, value: Value) -> Self {
        self.state.lock().unwrap().memories.insert(key.into(), value);
        self
    }

    /// Make every subsequent call of `op` fail with `error` until cleared.
    pub fn fail_with(&self, op: RemoteOp, error: ApiError) {
        self.state.lock().unwrap().failures.insert(op, error);
    }

    /// Remove a failure injection.
    pub fn clear_failure(&self, op: RemoteOp) {
        self.state.lock().unwrap().failures.remove(&op);
    }

    /// Snapshot of all recorded calls, in execution order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().journal.clone()
    }

    /// How many calls of one kind were recorded.
    pub fn call_count(&self, op: RemoteOp) -> usize {
        self.state
            .lock()
            .unwrap()
            .journal
            .iter()
            .filter(|call| call.op == op)
            .count()
    }

    /// Current stored value under a key, if any.
    pub fn memory(&self, key: &str) -> Option<Value> {
        self.state.lock().unwrap().memories.get(key).cloned()
    }

    fn record(&self, op: RemoteOp, key: Option<&str>, body: Option<&Value>) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(RecordedCall {
            op,
            key: key.map(str::to_string),
            body: body.cloned(),
        });
        match state.failures.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteApi for MockRemoteApi {
    async fn validate_credential(&self, _credential: &str) -> ApiResult<bool> {
        self.record(RemoteOp::ValidateCredential, None, None)?;
        Ok(true)
    }

    async fn fetch_identity(&self) -> ApiResult<UserInfo> {
        self.record(RemoteOp::FetchIdentity, None, None)?;
        Ok(self.identity.clone())
    }

    async fn memory_get(&self, key: &str) -> ApiResult<Option<Value>> {
        self.record(RemoteOp::MemoryGet, Some(key), None)?;
        Ok(self.state.lock().unwrap().memories.get(key).cloned())
    }

    async fn memory_create(&self, key: &str, value: Value) -> ApiResult<()> {
        self.record(RemoteOp::MemoryCreate, Some(key), Some(&value))?;
        self.state.lock().unwrap().memories.insert(key.to_string(), value);
        Ok(())
    }

    async fn memory_replace(&self, key: &str, value: Value) -> ApiResult<()> {
        self.record(RemoteOp::MemoryReplace, Some(key), Some(&value))?;
        self.state.lock().unwrap().memories.insert(key.to_string(), value);
        Ok(())
    }

    async fn memory_delete(&self, key: &str) -> ApiResult<()> {
        self.record(RemoteOp::MemoryDelete, Some(key), None)?;
        match self.state.lock().unwrap().memories.remove(key) {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound),
        }
    }
}

impl std::fmt::Debug for MockRemoteApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("MockRemoteApi")
            .field("user_id", &self.identity.id)
            .field("memories", &state.memories.len())
            .field("calls", &state.journal.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_absent_key_is_none() {
        let api = MockRemoteApi::new("user-1");
        assert_eq!(api.memory_get("missing").await.unwrap(), None);
        assert_eq!(api.call_count(RemoteOp::MemoryGet), 1);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let api = MockRemoteApi::new("user-1");
        api.memory_create("k", json!({"a": 1})).await.unwrap();
        assert_eq!(api.memory_get("k").await.unwrap(), Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_replace_overwrites() {
        let api = MockRemoteApi::new("user-1").with_memory("k", json!(1));
        api.memory_replace("k", json!(2)).await.unwrap();
        assert_eq!(api.memory("k"), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_delete_absent_is_not_found() {
        let api = MockRemoteApi::new("user-1");
        assert_eq!(api.memory_delete("k").await.unwrap_err(), ApiError::NotFound);
    }

    #[tokio::test]
    async fn test_failure_injection_and_clear() {
        let api = MockRemoteApi::new("user-1");
        api.fail_with(
            RemoteOp::FetchIdentity,
            ApiError::RemoteFailure {
                status: 500,
                body: "down".to_string(),
            },
        );
        assert!(api.fetch_identity().await.is_err());

        api.clear_failure(RemoteOp::FetchIdentity);
        assert_eq!(api.fetch_identity().await.unwrap().id, "user-1");
    }

    #[tokio::test]
    async fn test_journal_records_bodies() {
        let api = MockRemoteApi::new("user-1");
        api.memory_create("k", json!({"x": true})).await.unwrap();
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].key.as_deref(), Some("k"));
        assert_eq!(calls[0].body, Some(json!({"x": true})));
    }
}
