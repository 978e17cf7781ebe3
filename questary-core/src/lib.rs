//! Questary Core - Entity Types
//!
//! Pure data structures for the questionnaire-sharing client. All other
//! crates depend on this. This crate contains only data types, identity
//! helpers, errors, and configuration - no IO.

mod config;
mod entities;
mod enums;
mod error;
mod identity;

pub use config::{ClientConfig, StoreConfig, DEFAULT_API_BASE_URL, DEFAULT_NAMESPACE};
pub use entities::{
    Document, Friend, Notification, Profile, ProfileUpdate, Questionnaire, QuestionnaireUpdate,
    ReceivedQuestionnaire, UserStats,
};
pub use enums::{Channel, FriendStatus, NotificationKind, ReceivedStatus};
pub use error::{ApiError, ApiResult, ConfigError, QuestaryError, QuestaryResult, StoreError};
pub use identity::{
    generate_friend_code, is_friend_code, memory_key, new_entity_id, DurationMs, EntityId,
    Timestamp, UserId, FRIEND_CODE_LEN, FRIEND_CODE_PREFIX,
};
