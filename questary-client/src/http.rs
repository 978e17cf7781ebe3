//! HTTP implementation of the remote API.

use crate::{ChannelQueues, CredentialProvider, RemoteApi, UserInfo};
use async_trait::async_trait;
use questary_core::{ApiError, ApiResult, Channel, ClientConfig, QuestaryResult};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Envelope the structured-memory service wraps every document in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemoryEnvelope {
    value: Value,
}

/// reqwest-backed [`RemoteApi`] funneling every call through the channel
/// queues.
pub struct HttpRemoteApi {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    queues: Arc<ChannelQueues>,
}

impl HttpRemoteApi {
    /// Build a client from validated configuration.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
        queues: Arc<ChannelQueues>,
    ) -> QuestaryResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
            queues,
        })
    }

    fn bearer(&self) -> ApiResult<String> {
        self.credentials
            .credential()
            .map(|credential| format!("Bearer {}", credential))
            .ok_or(ApiError::Unauthenticated)
    }

    fn memory_url(&self, key: &str) -> String {
        format!("{}/structured-memories/{}", self.base_url, key)
    }
}

/// Map a non-2xx status and its captured body onto an error kind.
fn classify_status(status: u16, body: String) -> ApiError {
    match status {
        404 => ApiError::NotFound,
        401 | 403 => ApiError::Unauthenticated,
        _ => ApiError::RemoteFailure { status, body },
    }
}

async fn classify_failure(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::warn!(status, %body, "remote call failed");
    classify_status(status, body)
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport {
        reason: err.to_string(),
    }
}

/// Minimal completions request used only to probe credential validity.
fn validation_probe() -> Value {
    json!({
        "model": "gpt-4o",
        "messages": [{ "role": "user", "content": "test" }],
        "max_tokens": 5
    })
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn validate_credential(&self, credential: &str) -> ApiResult<bool> {
        let url = format!("{}/models/v1/chat/completions", self.base_url);
        let bearer = format!("Bearer {}", credential);
        self.queues
            .channel(Channel::CompletionsPrimary)
            .enqueue(|| async {
                let response = self
                    .client
                    .post(&url)
                    .header(AUTHORIZATION, &bearer)
                    .json(&validation_probe())
                    .send()
                    .await
                    .map_err(transport)?;
                let status = response.status();
                if !status.is_success() {
                    tracing::warn!(status = status.as_u16(), "credential rejected");
                }
                Ok(status.is_success())
            })
            .await
    }

    async fn fetch_identity(&self) -> ApiResult<UserInfo> {
        let url = format!("{}/user/me", self.base_url);
        let bearer = self.bearer()?;
        self.queues
            .channel(Channel::StructuredMemory)
            .enqueue(|| async {
                let response = self
                    .client
                    .get(&url)
                    .header(AUTHORIZATION, &bearer)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(transport)?;
                if !response.status().is_success() {
                    return Err(classify_failure(response).await);
                }
                response.json().await.map_err(|e| ApiError::InvalidResponse {
                    reason: e.to_string(),
                })
            })
            .await
    }

    async fn memory_get(&self, key: &str) -> ApiResult<Option<Value>> {
        let url = self.memory_url(key);
        let bearer = self.bearer()?;
        self.queues
            .channel(Channel::StructuredMemory)
            .enqueue(|| async {
                let response = self
                    .client
                    .get(&url)
                    .header(AUTHORIZATION, &bearer)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(transport)?;
                if response.status() == StatusCode::NOT_FOUND {
                    tracing::debug!(%url, "no stored document");
                    return Ok(None);
                }
                if !response.status().is_success() {
                    return Err(classify_failure(response).await);
                }
                let envelope: MemoryEnvelope =
                    response.json().await.map_err(|e| ApiError::InvalidResponse {
                        reason: e.to_string(),
                    })?;
                Ok(Some(envelope.value))
            })
            .await
    }

    async fn memory_create(&self, key: &str, value: Value) -> ApiResult<()> {
        let url = self.memory_url(key);
        let bearer = self.bearer()?;
        let envelope = MemoryEnvelope { value };
        self.queues
            .channel(Channel::StructuredMemory)
            .enqueue(|| async {
                let response = self
                    .client
                    .post(&url)
                    .header(AUTHORIZATION, &bearer)
                    .json(&envelope)
                    .send()
                    .await
                    .map_err(transport)?;
                if !response.status().is_success() {
                    return Err(classify_failure(response).await);
                }
                Ok(())
            })
            .await
    }

    async fn memory_replace(&self, key: &str, value: Value) -> ApiResult<()> {
        let url = self.memory_url(key);
        let bearer = self.bearer()?;
        let envelope = MemoryEnvelope { value };
        self.queues
            .channel(Channel::StructuredMemory)
            .enqueue(|| async {
                let response = self
                    .client
                    .put(&url)
                    .header(AUTHORIZATION, &bearer)
                    .json(&envelope)
                    .send()
                    .await
                    .map_err(transport)?;
                if !response.status().is_success() {
                    return Err(classify_failure(response).await);
                }
                Ok(())
            })
            .await
    }

    async fn memory_delete(&self, key: &str) -> ApiResult<()> {
        let url = self.memory_url(key);
        let bearer = self.bearer()?;
        self.queues
            .channel(Channel::StructuredMemory)
            .enqueue(|| async {
                let response = self
                    .client
                    .delete(&url)
                    .header(AUTHORIZATION, &bearer)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(transport)?;
                if !response.status().is_success() {
                    return Err(classify_failure(response).await);
                }
                Ok(())
            })
            .await
    }
}

impl std::fmt::Debug for HttpRemoteApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteApi")
            .field("base_url", &self.base_url)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_not_found() {
        assert_eq!(classify_status(404, String::new()), ApiError::NotFound);
    }

    #[test]
    fn test_classify_status_unauthenticated() {
        assert_eq!(classify_status(401, String::new()), ApiError::Unauthenticated);
        assert_eq!(classify_status(403, String::new()), ApiError::Unauthenticated);
    }

    #[test]
    fn test_classify_status_captures_body() {
        let err = classify_status(500, "quota exceeded".to_string());
        assert_eq!(
            err,
            ApiError::RemoteFailure {
                status: 500,
                body: "quota exceeded".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_round_trip() {
        let envelope = MemoryEnvelope {
            value: json!({ "profile": { "name": "Ada" } }),
        };
        let text = serde_json::to_string(&envelope).unwrap();
        assert!(text.starts_with("{\"value\":"));
        let back: MemoryEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back.value["profile"]["name"], "Ada");
    }

    #[test]
    fn test_validation_probe_shape() {
        let probe = validation_probe();
        assert_eq!(probe["model"], "gpt-4o");
        assert_eq!(probe["max_tokens"], 5);
        assert_eq!(probe["messages"][0]["role"], "user");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig {
            api_base_url: "https://example.com/".to_string(),
            ..ClientConfig::default()
        };
        let api = HttpRemoteApi::new(
            &config,
            Arc::new(crate::StaticCredential::new("sk-test")),
            Arc::new(ChannelQueues::new(&config)),
        )
        .unwrap();
        assert_eq!(api.memory_url("k"), "https://example.com/structured-memories/k");
    }
}
