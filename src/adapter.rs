use crate::config::SessionConfig;
use crate::error::Result;
use crate::expiry::compute_expiry;
use crate::session::Session;
use crate::sid::{failed_sid_digest, RandomSidGenerator, SidGenerator};
use crate::store::{SessionRecord, SessionRecordStore};
use crate::transport::{embed_sid, embed_tombstone, extract_sid, SessionRequest, SessionResponse};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// The capability surface shared by the real adapter and the
/// [`testing`](crate::testing) double, selected at configuration time.
///
/// Framework bindings program against this trait so that a deployment can
/// swap in the no-op testing variant without touching handler code.
#[async_trait]
pub trait SessionLifecycle: Send + Sync {
    /// Resolve the inbound session for a request. See
    /// [`SessionAdapter::open_session`].
    async fn open_session(&self, request: &SessionRequest) -> Result<Session>;

    /// Finish the session at the end of a request. See
    /// [`SessionAdapter::close_session`].
    async fn close_session(&self, session: Session, response: &mut SessionResponse) -> Result<()>;

    /// Clear the session and immediately delete its record. See
    /// [`SessionAdapter::abandon`].
    async fn abandon(&self, session: &mut Session) -> Result<()>;

    /// Discard the session and mint a fresh one. See
    /// [`SessionAdapter::create`].
    async fn create(&self, session: &mut Session) -> Result<()>;
}

/// The session adapter: binds a server-stored session record to a client
/// via a cookie- or header-carried session id, orchestrating the record's
/// creation, mutation, expiration and deletion across the
/// request/response cycle.
///
/// The adapter holds no shared mutable state across requests beyond its
/// read-only configuration; each [`Session`] is exclusively owned by the
/// request that opened it. The record store is the only shared resource,
/// and concurrent requests for the same session id are a last-write-wins
/// race by design.
pub struct SessionAdapter {
    config: SessionConfig,
    store: Arc<dyn SessionRecordStore>,
    sid_generator: Box<dyn SidGenerator>,
}

impl std::fmt::Debug for SessionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionAdapter {
    /// Create an adapter over the given record store, generating session
    /// ids randomly with the configured byte length.
    pub fn new(config: SessionConfig, store: Arc<dyn SessionRecordStore>) -> Self {
        let sid_generator = Box::new(RandomSidGenerator::new(config.sid_byte_length));
        Self::new_with_sid_generator(config, store, sid_generator)
    }

    /// Create an adapter with a custom session id generator, e.g. the
    /// deterministic [`DebugSidGenerator`](crate::DebugSidGenerator) in
    /// tests.
    pub fn new_with_sid_generator(
        config: SessionConfig,
        store: Arc<dyn SessionRecordStore>,
        sid_generator: Box<dyn SidGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            sid_generator,
        }
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn fresh_session(&self) -> Session {
        Session::fresh(
            self.sid_generator.generate(),
            Utc::now(),
            self.config.idle_timeout_seconds,
            self.config.effective_absolute_timeout(),
        )
    }

    /// Resolve the inbound session for a request.
    ///
    /// If the request carries no session id, a fresh session is returned.
    /// If it carries one that the store rejects as missing, expired or
    /// malformed, a warning is logged (never the raw id), a fresh session
    /// is returned, and the rejected id's diagnostic digest is exposed
    /// via [`Session::failed_sid_digest`]. Any other store failure is
    /// propagated: downgrading an outage to "new visitor" would mask it.
    pub async fn open_session(&self, request: &SessionRequest) -> Result<Session> {
        let Some(sid) = extract_sid(request, &self.config) else {
            return Ok(self.fresh_session());
        };

        match self.store.load(&sid).await {
            Ok(record) => Ok(Session::from_record(record)),
            Err(error) if error.is_not_found() => {
                log::warn!("substituting a fresh session: {error}");
                let mut session = self.fresh_session();
                session.set_failed_sid_digest(failed_sid_digest(&sid));
                Ok(session)
            }
            Err(error) => Err(error),
        }
    }

    /// Finish the session at the end of a request.
    ///
    /// A cleared session has its record deleted (tolerating records
    /// already gone) and a tombstone written to the transport. Otherwise
    /// the session is persisted iff [`Session::should_persist`] says so,
    /// with a refreshed expiration, and the session id is embedded into
    /// the response transport. A new session nobody wrote to produces no
    /// store write and no transport write at all, so the client retains
    /// no identifier for a session that was never materialized.
    pub async fn close_session(
        &self,
        session: Session,
        response: &mut SessionResponse,
    ) -> Result<()> {
        if session.is_cleared() {
            self.store.clear(session.session_id()).await?;
            embed_tombstone(response, &self.config);
            return Ok(());
        }

        if session.should_persist() {
            let expires_at = compute_expiry(
                session.created_at(),
                session.idle_timeout_seconds(),
                session.absolute_timeout_seconds(),
                Utc::now(),
            );
            let record = SessionRecord::from_session(&session, expires_at);
            self.store.save(&record).await?;
            embed_sid(response, session.session_id(), expires_at, &self.config);
        }

        Ok(())
    }

    /// Clear the session and immediately delete its record, without
    /// waiting for [`close_session`](Self::close_session). A store lookup
    /// for the id observes the deletion before the response is produced.
    pub async fn abandon(&self, session: &mut Session) -> Result<()> {
        session.clear();
        self.store.clear(session.session_id()).await
    }

    /// Discard the current session and replace it with a fresh one under
    /// a brand-new id, regardless of prior state. Used both for reissuing
    /// the id of an existing session and for starting over after a
    /// logout.
    pub async fn create(&self, session: &mut Session) -> Result<()> {
        *session = self.fresh_session();
        Ok(())
    }
}

#[async_trait]
impl SessionLifecycle for SessionAdapter {
    async fn open_session(&self, request: &SessionRequest) -> Result<Session> {
        SessionAdapter::open_session(self, request).await
    }

    async fn close_session(&self, session: Session, response: &mut SessionResponse) -> Result<()> {
        SessionAdapter::close_session(self, session, response).await
    }

    async fn abandon(&self, session: &mut Session) -> Result<()> {
        SessionAdapter::abandon(self, session).await
    }

    async fn create(&self, session: &mut Session) -> Result<()> {
        SessionAdapter::create(self, session).await
    }
}
