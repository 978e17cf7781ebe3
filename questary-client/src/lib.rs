//! Questary Client - Rate-Limited Remote API
//!
//! Transport layer for the questionnaire-sharing client: the per-channel
//! request queue, the remote API trait with its reqwest implementation,
//! credential provisioning, and an in-memory mock backend for tests.

mod api;
mod credentials;
mod http;
mod mock;
mod queue;

pub use api::{RemoteApi, UserInfo};
pub use credentials::{CredentialProvider, CredentialStore, StaticCredential, DEFAULT_FRESHNESS};
pub use http::HttpRemoteApi;
pub use mock::{MockRemoteApi, RecordedCall, RemoteOp};
pub use queue::{ChannelQueues, RequestQueue};
