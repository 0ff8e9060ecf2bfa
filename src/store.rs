use crate::error::Result;
use crate::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The wire shape of one persisted session, keyed by its session id.
///
/// The timeouts are captured per record so that a configuration change
/// between sessions does not retroactively change the policy of records
/// already written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The session id the record is stored under.
    pub sid: String,
    /// The application payload.
    pub data: HashMap<String, Value>,
    /// When the session was created. Never changes across saves.
    pub created_at: DateTime<Utc>,
    /// The idle timeout captured when the session was created.
    pub idle_timeout_seconds: i64,
    /// The absolute timeout captured when the session was created.
    pub absolute_timeout_seconds: i64,
    /// When the record expires: the minimum of the idle and absolute
    /// expiries, refreshed on every save.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// **This method should only be called by a session adapter!**
    ///
    /// Snapshot a session into its wire shape, stamping the expiration
    /// computed for this save.
    pub fn from_session(session: &Session, expires_at: DateTime<Utc>) -> Self {
        Self {
            sid: session.session_id().to_owned(),
            data: session.data().clone(),
            created_at: session.created_at(),
            idle_timeout_seconds: session.idle_timeout_seconds(),
            absolute_timeout_seconds: session.absolute_timeout_seconds(),
            expires_at,
        }
    }
}

/// The storage collaborator: an async key-value record store addressed by
/// session id.
///
/// The adapter performs at most one [`load`](Self::load) and at most one
/// [`save`](Self::save) or [`clear`](Self::clear) per request, as
/// blocking point-to-point calls with no adapter-level retry. Retries and
/// timeouts, if any, belong to the implementation. Concurrent requests
/// for the same session id are a last-write-wins race by design, so
/// implementations need not serialize them.
#[async_trait]
pub trait SessionRecordStore: Send + Sync {
    /// Load the record stored under `sid`.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) if the
    /// record is missing, expired, or the id is malformed. Any other
    /// failure is treated as fatal by the adapter.
    async fn load(&self, sid: &str) -> Result<SessionRecord>;

    /// Upsert the record, refreshing its expiration.
    async fn save(&self, record: &SessionRecord) -> Result<()>;

    /// Delete the record stored under `sid`. Deleting a record that is
    /// already gone is a no-op, not an error.
    async fn clear(&self, sid: &str) -> Result<()>;
}
