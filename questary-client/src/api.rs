//! Remote API trait.
//!
//! One method per remote operation; implementations own their transport and
//! rate limiting. The document store only sees this seam.

use async_trait::async_trait;
use questary_core::{ApiResult, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User object returned by the identity endpoint.
///
/// Only `id` matters to the core; other fields ride along when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The remote persistence and identity service.
///
/// Documents are opaque JSON values here; typing them is the store's job.
/// `memory_get` is the only operation that treats 404 as a legitimate
/// answer (`Ok(None)`), every other not-found surfaces as an error.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Probe whether a candidate credential is accepted by the service.
    /// Resolves `Ok(false)` on rejection; errors are transport-level only.
    async fn validate_credential(&self, credential: &str) -> ApiResult<bool>;

    /// Fetch the authenticated user's identity.
    async fn fetch_identity(&self) -> ApiResult<UserInfo>;

    /// Fetch a stored document. Absent key resolves to `Ok(None)`.
    async fn memory_get(&self, key: &str) -> ApiResult<Option<Value>>;

    /// Create a document under a key.
    async fn memory_create(&self, key: &str, value: Value) -> ApiResult<()>;

    /// Replace the document under a key wholesale.
    async fn memory_replace(&self, key: &str, value: Value) -> ApiResult<()>;

    /// Delete the document under a key.
    async fn memory_delete(&self, key: &str) -> ApiResult<()>;
}
