use crate::store::SessionRecord;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// One session with a client: the key/value payload plus the lifecycle
/// flags that drive the save decision at the end of the request.
///
/// It is marked `#[must_use]`, as dropping it will not update the record
/// store. Instead, it should be passed to
/// [`SessionAdapter::close_session`](crate::SessionAdapter::close_session).
///
/// # Mutation tracking
///
/// Every key mutation routes through [`insert`](Self::insert) or
/// [`remove`](Self::remove), which flip [`is_modified`](Self::is_modified)
/// on the first write. The flag is never cleared for the lifetime of the
/// instance. [`clear`](Self::clear) is terminal: once cleared, the record
/// is deleted at the end of the request and later writes cannot resurrect
/// persistence.
#[derive(Debug, Clone)]
#[must_use]
pub struct Session {
    session_id: String,
    data: HashMap<String, Value>,
    created_at: DateTime<Utc>,
    idle_timeout_seconds: i64,
    absolute_timeout_seconds: i64,
    is_new: bool,
    modified: bool,
    cleared: bool,
    failed_sid_digest: Option<String>,
}

impl Session {
    /// **This method should only be called by a session adapter!**
    ///
    /// Create a fresh session: a brand-new id, an empty payload, and
    /// `is_new` set. The id is assigned here and not deferred to save
    /// time, so diagnostic and deletion paths can reference it before a
    /// persistence write ever happens.
    pub fn fresh(
        session_id: String,
        created_at: DateTime<Utc>,
        idle_timeout_seconds: i64,
        absolute_timeout_seconds: i64,
    ) -> Self {
        Self {
            session_id,
            data: HashMap::new(),
            created_at,
            idle_timeout_seconds,
            absolute_timeout_seconds,
            is_new: true,
            modified: false,
            cleared: false,
            failed_sid_digest: None,
        }
    }

    /// **This method should only be called by a session adapter!**
    ///
    /// Create a session instance from a record loaded out of the store.
    /// The instance is not new, not modified and not cleared.
    pub fn from_record(record: SessionRecord) -> Self {
        Self {
            session_id: record.sid,
            data: record.data,
            created_at: record.created_at,
            idle_timeout_seconds: record.idle_timeout_seconds,
            absolute_timeout_seconds: record.absolute_timeout_seconds,
            is_new: false,
            modified: false,
            cleared: false,
            failed_sid_digest: None,
        }
    }

    /// The current session id. Always present and non-empty.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The instant this session was created. Set once, never mutated.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The idle timeout captured when this session was created or loaded.
    /// May differ between records if the configuration changed between
    /// sessions.
    pub fn idle_timeout_seconds(&self) -> i64 {
        self.idle_timeout_seconds
    }

    /// The absolute timeout captured when this session was created or
    /// loaded.
    pub fn absolute_timeout_seconds(&self) -> i64 {
        self.absolute_timeout_seconds
    }

    /// True iff no existing record was found for this request, i.e. this
    /// is the first use of this session id.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// True iff any key was set or removed during this request.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use chrono::Utc;
    /// # use stored_session::Session;
    /// let mut session = Session::fresh("sid".into(), Utc::now(), 300, 3600);
    /// assert!(!session.is_modified());
    /// session.insert("k", serde_json::json!("v"));
    /// assert!(session.is_modified());
    /// ```
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// True iff the session was explicitly invalidated during this
    /// request.
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// The diagnostic digest of an inbound session id the store rejected,
    /// if any. A lowercase hex SHA-512 of the rejected id, never the raw
    /// id itself, and only ever present on a new instance.
    pub fn failed_sid_digest(&self) -> Option<&str> {
        self.failed_sid_digest.as_deref()
    }

    /// Returns the value stored under `key`. Does not mark the session as
    /// modified.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Store `value` under `key`, marking the session as modified.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.modified = true;
        self.data.insert(key.into(), value)
    }

    /// Remove the value stored under `key`, marking the session as
    /// modified.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.modified = true;
        self.data.remove(key)
    }

    /// The number of keys in the payload.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the payload holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Invalidate this session: the payload is emptied and the record is
    /// deleted from the store at the end of the request.
    ///
    /// Idempotent, and terminal for this request: no later write brings
    /// persistence back.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use chrono::Utc;
    /// # use stored_session::Session;
    /// let mut session = Session::fresh("sid".into(), Utc::now(), 300, 3600);
    /// session.insert("k", serde_json::json!("v"));
    /// session.clear();
    /// session.clear();
    /// assert!(session.is_cleared());
    /// assert!(session.is_empty());
    /// assert!(!session.should_persist());
    /// ```
    pub fn clear(&mut self) {
        self.cleared = true;
        self.data.clear();
    }

    /// Whether a persistence write is required for this session.
    ///
    /// A cleared session is never persisted, its record is deleted
    /// instead. Otherwise any session that already exists in the store is
    /// re-saved even without data changes, purely to refresh its
    /// expiration, while a brand-new session nobody wrote to is not worth
    /// persisting. That keeps unauthenticated page views from flooding
    /// the store with empty records.
    ///
    /// | new   | modified | persist? |
    /// |-------|----------|----------|
    /// | false | false    | true     |
    /// | false | true     | true     |
    /// | true  | false    | false    |
    /// | true  | true     | true     |
    pub fn should_persist(&self) -> bool {
        !self.cleared && (self.modified || !self.is_new)
    }

    /// The full payload, for record construction and test assertions.
    pub fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }

    pub(crate) fn set_failed_sid_digest(&mut self, digest: String) {
        self.failed_sid_digest = Some(digest);
    }
}
