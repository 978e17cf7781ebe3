//! Error types for Questary operations

use crate::EntityId;
use thiserror::Error;

/// Remote API layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Remote document not found")]
    NotFound,

    #[error("Missing or invalid credential")]
    Unauthenticated,

    #[error("Remote call failed with status {status}: {body}")]
    RemoteFailure { status: u16, body: String },

    #[error("Transport error: {reason}")]
    Transport { reason: String },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Call timed out after {limit_ms}ms")]
    Timeout { limit_ms: u64 },
}

/// Document store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store used before initialization completed")]
    NotInitialized,

    #[error("Questionnaire not found: {id}")]
    QuestionnaireNotFound { id: EntityId },

    #[error("Received questionnaire not found: {id}")]
    ReceivedNotFound { id: EntityId },

    #[error("Friend not found: {id}")]
    FriendNotFound { id: EntityId },

    #[error("Invalid friend code: {code}")]
    InvalidFriendCode { code: String },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: EntityId },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Questary errors.
#[derive(Debug, Clone, Error)]
pub enum QuestaryError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Questary operations.
pub type QuestaryResult<T> = Result<T, QuestaryError>;

/// Result type alias for remote API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// TESTS
// =============================================================================
