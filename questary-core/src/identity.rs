//! Identity types and key derivation helpers

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Entity identifier. Random v4, matching the ids already persisted in
/// existing documents.
pub type EntityId = Uuid;

/// Remote user identifier, opaque string issued by the identity endpoint.
pub type UserId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Duration in milliseconds for interval and timeout values.
pub type DurationMs = u64;

/// Prefix every friend code carries on the wire.
pub const FRIEND_CODE_PREFIX: &str = "BFF-";

/// Number of random characters after the friend-code prefix.
pub const FRIEND_CODE_LEN: usize = 6;

const FRIEND_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a new random EntityId.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Derive the structured-memory key for a user.
///
/// Pure function so tests can assert the exact key a store instance will
/// read and write: `"<namespace>-<user_id>"`.
pub fn memory_key(namespace: &str, user_id: &str) -> String {
    format!("{}-{}", namespace, user_id)
}

/// Generate a short human-shareable friend code, e.g. `BFF-X4K9QZ`.
///
/// Randomness comes from a v4 UUID; each byte is mapped onto the
/// uppercase-alphanumeric charset.
pub fn generate_friend_code() -> String {
    let bytes = *Uuid::new_v4().as_bytes();
    let mut code = String::with_capacity(FRIEND_CODE_PREFIX.len() + FRIEND_CODE_LEN);
    code.push_str(FRIEND_CODE_PREFIX);
    for byte in bytes.iter().take(FRIEND_CODE_LEN) {
        let idx = (*byte as usize) % FRIEND_CODE_CHARSET.len();
        code.push(FRIEND_CODE_CHARSET[idx] as char);
    }
    code
}

/// Check whether a string has the shape of a friend code.
///
/// Shape only: a well-formed code may still be unknown to every document.
pub fn is_friend_code(candidate: &str) -> bool {
    let Some(suffix) = candidate.strip_prefix(FRIEND_CODE_PREFIX) else {
        return false;
    };
    suffix.len() == FRIEND_CODE_LEN
        && suffix.bytes().all(|b| FRIEND_CODE_CHARSET.contains(&b))
}

// =============================================================================
// TESTS
// =============================================================================
