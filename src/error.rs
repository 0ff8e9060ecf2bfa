/// All errors that can occur in this crate.
///
/// The variants split into two kinds with very different handling:
/// [`Error::NotFound`] is recoverable and the adapter substitutes a fresh
/// session for it, while [`Error::Store`] is an infrastructure failure
/// and is propagated to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The supplied session id does not resolve to a record.
    /// The record is missing, expired, or the id is malformed.
    ///
    /// This is the only store failure the adapter recovers from.
    /// Masking any other failure as a new visitor would hide outages.
    #[error("the supplied session id does not resolve to a session record")]
    NotFound,

    /// The record store itself failed: unreachable, misconfigured, or it
    /// returned a record the adapter cannot make sense of.
    #[error("session record store failure: {0}")]
    Store(anyhow::Error),
}

/// A `Result` with this crate's [`Error`] and a default return type of `()`.
pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an arbitrary backend failure as a fatal store error.
    pub fn store(error: impl Into<anyhow::Error>) -> Self {
        Self::Store(error.into())
    }

    /// Returns true if this is the recoverable [`Error::NotFound`] kind.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use stored_session::Error;
    /// assert!(Error::NotFound.is_not_found());
    /// assert!(!Error::store(anyhow::Error::msg("connection refused")).is_not_found());
    /// ```
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
