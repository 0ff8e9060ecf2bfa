//! Async HTTP session adapter.
//!
//! This crate binds an opaque, server-stored session record to a client
//! via a cookie- or header-carried session id, and manages the record's
//! creation, mutation, expiration and deletion across the
//! request/response cycle. The storage backend is abstracted behind the
//! [`SessionRecordStore`] trait; an in-memory implementation is provided
//! for tests.
//!
//! # Change tracking
//!
//! Changes are tracked automatically. Whenever a session key is set or
//! removed, the session is marked as modified. At the end of the request
//! the adapter persists a session iff it was modified or already existed
//! in the store; existing sessions are re-saved even without changes,
//! purely to refresh their expiration, while a fresh session nobody
//! wrote to is silently dropped. See [`Session::should_persist`].
//!
//! # Expiration
//!
//! Sessions carry an idle timeout, refreshed on every save, and an
//! absolute timeout fixed at creation. The effective expiry is the
//! minimum of the two, so activity extends a session but never past its
//! absolute lifetime ceiling. See [`compute_expiry`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stored_session::{MemoryStore, SessionAdapter, SessionConfig, SessionRequest, SessionResponse};
//!
//! # fn main() -> stored_session::Result {
//! # async_std::task::block_on(async {
//! #
//! let store = Arc::new(MemoryStore::new());
//! let adapter = SessionAdapter::new(SessionConfig::default(), store);
//!
//! // Pre-handler: the request carries no session id, so a fresh session
//! // is minted.
//! let mut session = adapter.open_session(&SessionRequest::new()).await?;
//! assert!(session.is_new());
//!
//! // The application writes to the session while handling the request.
//! session.insert("user", serde_json::json!("ferris"));
//!
//! // Post-handler: the modified session is persisted and its id is
//! // embedded into the response cookie.
//! let mut response = SessionResponse::new();
//! let sid = session.session_id().to_owned();
//! adapter.close_session(session, &mut response).await?;
//! assert_eq!(response.cookie("id").unwrap().value, sid);
//! #
//! # Ok(()) }) }
//! ```

#![forbid(unsafe_code)]
#![deny(
    future_incompatible,
    missing_debug_implementations,
    nonstandard_style,
    missing_docs,
    unreachable_pub,
    missing_copy_implementations,
    unused_qualifications
)]

mod adapter;
mod config;
mod error;
mod expiry;
mod memory_store;
mod session;
mod sid;
mod store;
pub mod testing;
mod transport;

pub use adapter::{SessionAdapter, SessionLifecycle};
pub use config::{
    SessionConfig, DEFAULT_ABSOLUTE_TIMEOUT_SECONDS, DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME,
    DEFAULT_IDLE_TIMEOUT_SECONDS, DEFAULT_PERMANENT_SESSION_LIFETIME_SECONDS,
    DEFAULT_SID_BYTE_LENGTH,
};
pub use error::{Error, Result};
pub use expiry::compute_expiry;
pub use memory_store::MemoryStore;
pub use session::Session;
pub use sid::{
    failed_sid_digest, DebugSidGenerator, RandomSidGenerator, SidGenerator, DEBUG_SID_LENGTH,
};
pub use store::{SessionRecord, SessionRecordStore};
pub use transport::{SameSite, SessionRequest, SessionResponse, SetCookie};
