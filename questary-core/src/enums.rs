//! Shared enums

use serde::{Deserialize, Serialize};

/// An independently rate-limited lane of outbound calls.
///
/// Channels are statically defined; each owns its own spacing timer and
/// never delays another channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Primary completions model lane (credential validation rides here).
    CompletionsPrimary,
    /// Secondary completions model lane.
    CompletionsSecondary,
    /// Structured-memory persistence lane (identity + document calls).
    StructuredMemory,
}

impl Channel {
    /// All statically defined channels.
    pub const ALL: [Channel; 3] = [
        Channel::CompletionsPrimary,
        Channel::CompletionsSecondary,
        Channel::StructuredMemory,
    ];

    /// Stable label used in logs and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::CompletionsPrimary => "completions-primary",
            Channel::CompletionsSecondary => "completions-secondary",
            Channel::StructuredMemory => "structured-memory",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a friend entry on the sender's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    /// Code generated, not yet redeemed.
    Pending,
    /// Code redeemed, questionnaire delivered.
    Received,
    /// Recipient submitted their answers.
    Completed,
}

/// Lifecycle of a received questionnaire on the recipient's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivedStatus {
    /// Delivered, no answers yet.
    Pending,
    /// Draft answers saved.
    InProgress,
    /// Answers submitted.
    Completed,
}

/// Kind of user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A friend's questionnaire landed in the inbox.
    QuestionnaireReceived,
    /// A recipient submitted answers to one of ours.
    QuestionnaireCompleted,
}

// =============================================================================
// TESTS
// =============================================================================
