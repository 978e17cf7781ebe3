//! Questary Store - Cached Document and Domain Operations
//!
//! Owns the single in-memory document per user and mediates every remote
//! read/write through the rate-limited client. Domain operations (profile,
//! questionnaires, friends, inbox, notifications) all follow the same
//! discipline: mutate the cached document inside the per-document critical
//! section, then push the whole document in one replace call.

mod friends;
mod inbox;
mod notifications;
mod questionnaires;
mod store;

pub use store::DocumentStore;
