//! Bearer credential provisioning.
//!
//! The transport layer asks for a credential synchronously right before a
//! channel call executes; storage, expiry, and revalidation policy live
//! outside the call path.

use chrono::{DateTime, Utc};
use std::sync::RwLock;
use std::time::Duration;

/// Default window after which a stored credential should be revalidated.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(24 * 60 * 60);

/// Supplies the bearer credential for outbound calls.
///
/// Returning `None` fails the call with `Unauthenticated` before any
/// network is consumed.
pub trait CredentialProvider: Send + Sync {
    /// The current credential, if one is available.
    fn credential(&self) -> Option<String>;
}

/// Fixed credential, mainly for tests and one-shot tools.
#[derive(Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(credential: impl Into<String>) -> Self {
        Self(credential.into())
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticCredential").field(&"[REDACTED]").finish()
    }
}

#[derive(Default)]
struct CredentialState {
    credential: Option<String>,
    last_validated: Option<DateTime<Utc>>,
}

/// Mutable credential slot with freshness tracking.
///
/// `needs_validation` reports staleness; it never blocks a call by itself.
/// Callers decide when to run the validation probe and record the outcome
/// with `mark_validated`.
pub struct CredentialStore {
    state: RwLock<CredentialState>,
    freshness: Duration,
}

impl CredentialStore {
    /// Create an empty store with the default 24h freshness window.
    pub fn new() -> Self {
        Self::with_freshness(DEFAULT_FRESHNESS)
    }

    /// Create an empty store with a custom freshness window.
    pub fn with_freshness(freshness: Duration) -> Self {
        Self {
            state: RwLock::new(CredentialState::default()),
            freshness,
        }
    }

    /// Store a credential. Clears any previous validation timestamp.
    pub fn set(&self, credential: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.credential = Some(credential.into());
            state.last_validated = None;
        }
    }

    /// Drop the credential and its validation timestamp.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            state.credential = None;
            state.last_validated = None;
        }
    }

    /// Record a successful validation at the current time.
    pub fn mark_validated(&self) {
        if let Ok(mut state) = self.state.write() {
            state.last_validated = Some(Utc::now());
        }
    }

    /// Whether a credential is present at all.
    pub fn has_credential(&self) -> bool {
        self.state
            .read()
            .map(|state| state.credential.is_some())
            .unwrap_or(false)
    }

    /// Whether the stored credential should be (re)validated: true when no
    /// credential is held, when it was never validated, or when the last
    /// validation is older than the freshness window.
    pub fn needs_validation(&self) -> bool {
        let Ok(state) = self.state.read() else {
            return true;
        };
        if state.credential.is_none() {
            return true;
        }
        match state.last_validated {
            None => true,
            Some(at) => {
                let age = Utc::now().signed_duration_since(at);
                age.to_std().map(|age| age > self.freshness).unwrap_or(true)
            }
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for CredentialStore {
    fn credential(&self) -> Option<String> {
        self.state.read().ok()?.credential.clone()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_credential", &self.has_credential())
            .field("freshness", &self.freshness)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
