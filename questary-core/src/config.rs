//! Configuration types

use crate::{ConfigError, QuestaryResult};
use std::time::Duration;

/// Default remote API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.wearables-ape.io";

/// Default structured-memory key namespace.
pub const DEFAULT_NAMESPACE: &str = "bff-questionary";

/// Transport and rate-limit configuration for the remote client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Remote API base URL, without trailing slash.
    pub api_base_url: String,
    /// reqwest-level timeout applied to every HTTP request.
    pub request_timeout: Duration,
    /// Minimum start-to-start spacing between calls on one channel.
    pub rate_interval: Duration,
    /// Optional queue-level limit on a single call's total run time.
    /// `None` disables the queue timeout; the request timeout still applies.
    pub call_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            rate_interval: Duration::from_secs(1),
            call_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> QuestaryResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "api_base_url".to_string(),
            }
            .into());
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".to_string(),
                value: self.api_base_url.clone(),
                reason: "must be an http(s) URL".to_string(),
            }
            .into());
        }
        if self.rate_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "rate_interval".to_string(),
                value: format!("{:?}", self.rate_interval),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout".to_string(),
                value: format!("{:?}", self.request_timeout),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if let Some(timeout) = self.call_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: "call_timeout".to_string(),
                    value: format!("{:?}", timeout),
                    reason: "must be positive when set".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Document store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Namespace prefixed onto every memory key.
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> QuestaryResult<()> {
        if self.namespace.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "namespace".to_string(),
            }
            .into());
        }
        if self.namespace.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "namespace".to_string(),
                value: self.namespace.clone(),
                reason: "must not contain whitespace".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
