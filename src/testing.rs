//! An in-memory testing double for the session lifecycle.
//!
//! [`TestAdapter`] implements [`SessionLifecycle`] without a record store
//! or transport: it hands every request the same shared instance, and
//! `close_session` and `abandon` perform no store writes. Test code can
//! seed session values before issuing a request via
//! [`TestAdapter::session_transaction`].

use crate::adapter::SessionLifecycle;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::Session;
use crate::sid::{RandomSidGenerator, SidGenerator};
use crate::transport::{SessionRequest, SessionResponse};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A no-op session lifecycle for tests.
///
/// # Example
///
/// ```rust
/// # use stored_session::testing::TestAdapter;
/// # use stored_session::{SessionConfig, SessionLifecycle, SessionRequest, SessionResponse};
/// # fn main() -> stored_session::Result {
/// # async_std::task::block_on(async {
/// let adapter = TestAdapter::new(&SessionConfig::default());
/// adapter.session_transaction(|session| {
///     session.insert("val", serde_json::json!("fake_value"));
/// });
///
/// let session = adapter.open_session(&SessionRequest::new()).await?;
/// assert_eq!(session.get("val"), Some(&serde_json::json!("fake_value")));
///
/// adapter.close_session(session, &mut SessionResponse::new()).await?;
/// # Ok(()) }) }
/// ```
#[derive(Debug)]
pub struct TestAdapter {
    config: SessionConfig,
    instance: Mutex<Session>,
}

impl TestAdapter {
    /// Create a testing adapter holding one fresh shared instance.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            config: config.clone(),
            instance: Mutex::new(fresh_instance(config)),
        }
    }

    fn instance(&self) -> MutexGuard<'_, Session> {
        self.instance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the shared instance directly, outside any request. The next
    /// [`open_session`](SessionLifecycle::open_session) observes the
    /// mutation.
    pub fn session_transaction(&self, f: impl FnOnce(&mut Session)) {
        f(&mut self.instance());
    }
}

fn fresh_instance(config: &SessionConfig) -> Session {
    Session::fresh(
        RandomSidGenerator::new(config.sid_byte_length).generate(),
        Utc::now(),
        config.idle_timeout_seconds,
        config.effective_absolute_timeout(),
    )
}

#[async_trait]
impl SessionLifecycle for TestAdapter {
    /// Hands out the shared instance, ignoring the request transport.
    async fn open_session(&self, _request: &SessionRequest) -> Result<Session> {
        Ok(self.instance().clone())
    }

    /// Stores the instance back so mutations stay visible to the next
    /// request. No record store or transport writes happen.
    async fn close_session(
        &self,
        session: Session,
        _response: &mut SessionResponse,
    ) -> Result<()> {
        *self.instance() = session;
        Ok(())
    }

    /// Clears the session but performs no store actions.
    async fn abandon(&self, session: &mut Session) -> Result<()> {
        session.clear();
        Ok(())
    }

    /// Replaces the session with a fresh shared instance.
    async fn create(&self, session: &mut Session) -> Result<()> {
        let fresh = fresh_instance(&self.config);
        *self.instance() = fresh.clone();
        *session = fresh;
        Ok(())
    }
}
