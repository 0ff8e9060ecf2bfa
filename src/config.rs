use crate::transport::SameSite;
use serde::{Deserialize, Serialize};

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "id";
/// Default name of the session header.
pub const DEFAULT_HEADER_NAME: &str = "x-id";
/// Default entropy of a generated session id, in bytes.
pub const DEFAULT_SID_BYTE_LENGTH: usize = 32;
/// Default idle timeout: two hours without access.
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: i64 = 7200;
/// Default absolute timeout: twelve hours after creation.
pub const DEFAULT_ABSOLUTE_TIMEOUT_SECONDS: i64 = 43200;
/// Default framework-level session lifetime ceiling: 31 days.
pub const DEFAULT_PERMANENT_SESSION_LIFETIME_SECONDS: i64 = 31 * 24 * 3600;

/// Process-wide adapter configuration.
///
/// Constructed once at startup and passed into the
/// [`SessionAdapter`](crate::SessionAdapter); it is never mutated
/// afterwards and is the only state the adapter shares across requests.
///
/// # Example
///
/// ```rust
/// # use stored_session::SessionConfig;
/// let config = SessionConfig {
///     use_header: true,
///     idle_timeout_seconds: 300,
///     ..Default::default()
/// };
/// assert_eq!(config.cookie_name(), "id");
/// assert_eq!(config.header_name, "x-id");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Entropy of generated session ids, in bytes.
    pub sid_byte_length: usize,
    /// Name of the backend table holding session records.
    /// Carried for the record store collaborator; the adapter itself
    /// never interprets it.
    pub table_name: String,
    /// Endpoint of the backend, if it is not the platform default.
    /// Carried for the record store collaborator, like `table_name`.
    pub endpoint_url: Option<String>,
    /// Seconds without access after which a session expires.
    pub idle_timeout_seconds: i64,
    /// Seconds after creation at which a session expires regardless of
    /// activity. Folded with the framework ceiling by
    /// [`effective_absolute_timeout`](Self::effective_absolute_timeout).
    pub absolute_timeout_seconds: Option<i64>,
    /// The host framework's own session lifetime ceiling. A longer
    /// per-adapter absolute timeout cannot bypass it.
    pub permanent_session_lifetime_seconds: i64,
    /// Whether the session id also travels in a response/request header.
    /// The cookie is written either way.
    pub use_header: bool,
    /// Name of the session id header, used only with `use_header`.
    pub header_name: String,
    /// Name of the session cookie. Only honored while
    /// `override_cookie_name` is true.
    pub cookie_name: String,
    /// The `Secure` cookie attribute. Only honored while
    /// `override_cookie_secure` is true.
    pub cookie_secure: bool,
    /// The `HttpOnly` cookie attribute.
    pub cookie_http_only: bool,
    /// The `SameSite` cookie attribute.
    pub cookie_same_site: SameSite,
    /// The `Domain` cookie attribute, if any.
    pub cookie_domain: Option<String>,
    /// The `Path` cookie attribute.
    pub cookie_path: String,
    /// When false, defer to the framework-level cookie name instead of
    /// `cookie_name`.
    pub override_cookie_name: bool,
    /// When false, defer to the framework-level secure setting instead of
    /// `cookie_secure`.
    pub override_cookie_secure: bool,
    /// The framework-level cookie name deferred to when
    /// `override_cookie_name` is false.
    pub framework_cookie_name: Option<String>,
    /// The framework-level secure setting deferred to when
    /// `override_cookie_secure` is false.
    pub framework_cookie_secure: Option<bool>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sid_byte_length: DEFAULT_SID_BYTE_LENGTH,
            table_name: "app_session".to_owned(),
            endpoint_url: None,
            idle_timeout_seconds: DEFAULT_IDLE_TIMEOUT_SECONDS,
            absolute_timeout_seconds: Some(DEFAULT_ABSOLUTE_TIMEOUT_SECONDS),
            permanent_session_lifetime_seconds: DEFAULT_PERMANENT_SESSION_LIFETIME_SECONDS,
            use_header: false,
            header_name: DEFAULT_HEADER_NAME.to_owned(),
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: SameSite::Strict,
            cookie_domain: None,
            cookie_path: "/".to_owned(),
            override_cookie_name: true,
            override_cookie_secure: true,
            framework_cookie_name: None,
            framework_cookie_secure: None,
        }
    }
}

impl SessionConfig {
    /// The absolute timeout actually applied to sessions: the configured
    /// absolute timeout capped by the framework lifetime ceiling, or the
    /// ceiling alone if no absolute timeout is configured.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use stored_session::SessionConfig;
    /// let mut config = SessionConfig {
    ///     absolute_timeout_seconds: Some(120),
    ///     permanent_session_lifetime_seconds: 230,
    ///     ..Default::default()
    /// };
    /// assert_eq!(config.effective_absolute_timeout(), 120);
    ///
    /// config.absolute_timeout_seconds = Some(160);
    /// config.permanent_session_lifetime_seconds = 140;
    /// assert_eq!(config.effective_absolute_timeout(), 140);
    ///
    /// config.absolute_timeout_seconds = None;
    /// assert_eq!(config.effective_absolute_timeout(), 140);
    /// ```
    pub fn effective_absolute_timeout(&self) -> i64 {
        match self.absolute_timeout_seconds {
            Some(absolute) => absolute.min(self.permanent_session_lifetime_seconds),
            None => self.permanent_session_lifetime_seconds,
        }
    }

    /// The cookie name in effect, honoring `override_cookie_name`.
    pub fn cookie_name(&self) -> &str {
        if !self.override_cookie_name {
            if let Some(name) = &self.framework_cookie_name {
                return name;
            }
        }
        &self.cookie_name
    }

    /// The `Secure` attribute in effect, honoring `override_cookie_secure`.
    pub fn cookie_secure(&self) -> bool {
        if !self.override_cookie_secure {
            if let Some(secure) = self.framework_cookie_secure {
                return secure;
            }
        }
        self.cookie_secure
    }
}
