use crate::error::{Error, Result};
use crate::store::{SessionRecord, SessionRecordStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// An in-memory session record store.
///
/// Because there is no external persistence, this store is ephemeral and
/// will be cleared on server restart. It backs the test suite and the
/// [`testing`](crate::testing) double; production deployments point the
/// adapter at a durable [`SessionRecordStore`] implementation instead.
///
/// Expired records are refused on load but only removed from memory by
/// [`cleanup`](Self::cleanup), which should run intermittently if the
/// store lives long enough for accumulation to matter.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, SessionRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Default::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, SessionRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of records in the store, expired ones included.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Returns a copy of the record stored under `sid`, ignoring expiry.
    /// Maintenance and test accessor; lookups go through
    /// [`SessionRecordStore::load`].
    pub fn record(&self, sid: &str) -> Option<SessionRecord> {
        self.records().get(sid).cloned()
    }

    /// Load the record stored under `sid` as of the instant `now`.
    ///
    /// This is [`SessionRecordStore::load`] with the clock injected, so
    /// tests can observe idle and absolute expiry without sleeping.
    pub fn load_at(&self, sid: &str, now: DateTime<Utc>) -> Result<SessionRecord> {
        match self.records().get(sid) {
            Some(record) if record.expires_at > now => Ok(record.clone()),
            _ => Err(Error::NotFound),
        }
    }

    /// Remove expired records.
    pub fn cleanup(&self) {
        log::trace!("cleaning up memory store");
        let now = Utc::now();
        let mut records = self.records();
        let initial_len = records.len();
        records.retain(|_, record| record.expires_at > now);
        log::trace!("deleted {} expired sessions", initial_len - records.len());
    }
}

#[async_trait]
impl SessionRecordStore for MemoryStore {
    async fn load(&self, sid: &str) -> Result<SessionRecord> {
        self.load_at(sid, Utc::now())
    }

    async fn save(&self, record: &SessionRecord) -> Result<()> {
        self.records().insert(record.sid.clone(), record.clone());
        Ok(())
    }

    async fn clear(&self, sid: &str) -> Result<()> {
        self.records().remove(sid);
        Ok(())
    }
}
