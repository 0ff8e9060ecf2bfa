use crate::config::SessionConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The `SameSite` attribute of the session cookie.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum SameSite {
    /// The cookie is only sent on same-site requests.
    Strict,
    /// The cookie is also sent on top-level cross-site navigation.
    Lax,
    /// The cookie is sent on all requests.
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// The request-side view the adapter needs from the host framework:
/// cookies and headers, addressable by name.
///
/// Framework bindings copy the relevant values in; the adapter never
/// touches the framework's own request type.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    cookies: HashMap<String, String>,
    headers: HashMap<String, String>,
}

impl SessionRequest {
    /// Create a request view without any cookies or headers.
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a cookie to the request view.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Add a header to the request view.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the value of the cookie with the given name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns the value of the header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// The response-side sink the adapter writes the session id transport
/// into. Framework bindings replay the recorded cookie and header writes
/// onto the framework's own response type.
#[derive(Debug, Clone, Default)]
pub struct SessionResponse {
    cookies: Vec<SetCookie>,
    headers: HashMap<String, String>,
}

impl SessionResponse {
    /// Create an empty response sink.
    pub fn new() -> Self {
        Default::default()
    }

    /// Record a cookie write. Later writes for the same cookie name win.
    pub fn set_cookie(&mut self, cookie: SetCookie) {
        self.cookies.retain(|existing| existing.name != cookie.name);
        self.cookies.push(cookie);
    }

    /// Record a header write.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Remove a previously recorded header write.
    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    /// Returns the recorded cookie write with the given name.
    pub fn cookie(&self, name: &str) -> Option<&SetCookie> {
        self.cookies.iter().find(|cookie| cookie.name == name)
    }

    /// Returns all recorded cookie writes.
    pub fn cookies(&self) -> &[SetCookie] {
        &self.cookies
    }

    /// Returns the recorded header write with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// A single recorded `Set-Cookie` write.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SetCookie {
    /// The cookie name.
    pub name: String,
    /// The cookie value. Empty for a tombstone.
    pub value: String,
    /// The `Expires` attribute. The Unix epoch for a tombstone.
    pub expires: Option<DateTime<Utc>>,
    /// The `Secure` attribute.
    pub secure: bool,
    /// The `HttpOnly` attribute.
    pub http_only: bool,
    /// The `SameSite` attribute.
    pub same_site: SameSite,
    /// The `Domain` attribute, if any.
    pub domain: Option<String>,
    /// The `Path` attribute.
    pub path: String,
}

impl SetCookie {
    /// Render this write as a `Set-Cookie` header value.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use stored_session::{SameSite, SetCookie};
    /// let cookie = SetCookie {
    ///     name: "id".into(),
    ///     value: "abc123".into(),
    ///     expires: None,
    ///     secure: true,
    ///     http_only: true,
    ///     same_site: SameSite::Strict,
    ///     domain: None,
    ///     path: "/".into(),
    /// };
    /// assert_eq!(
    ///     cookie.header_value(),
    ///     "id=abc123; Secure; HttpOnly; SameSite=Strict; Path=/"
    /// );
    /// ```
    pub fn header_value(&self) -> String {
        let mut rendered = format!("{}={}", self.name, self.value);
        if let Some(expires) = &self.expires {
            rendered.push_str("; Expires=");
            rendered.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        if self.secure {
            rendered.push_str("; Secure");
        }
        if self.http_only {
            rendered.push_str("; HttpOnly");
        }
        rendered.push_str("; SameSite=");
        rendered.push_str(self.same_site.as_str());
        if let Some(domain) = &self.domain {
            rendered.push_str("; Domain=");
            rendered.push_str(domain);
        }
        rendered.push_str("; Path=");
        rendered.push_str(&self.path);
        rendered
    }

    /// Returns true if this write instructs the client to delete the
    /// cookie: an empty value expiring at the Unix epoch.
    pub fn is_tombstone(&self) -> bool {
        self.value.is_empty() && self.expires == Some(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Extract the candidate session id carried by the request.
///
/// With `use_header` enabled the cookie is consulted first and the header
/// is the fallback, so header-based clients may rely on the cookie this
/// adapter also sets. With `use_header` disabled only the cookie is
/// consulted, the header is never read. This asymmetry is deliberate and
/// matched by the embedding policy below.
pub(crate) fn extract_sid(request: &SessionRequest, config: &SessionConfig) -> Option<String> {
    let from_cookie = request.cookie(config.cookie_name());
    let sid = if config.use_header {
        from_cookie.or_else(|| request.header(&config.header_name))
    } else {
        from_cookie
    };
    sid.map(str::to_owned)
}

/// Embed the session id into the response transport.
///
/// The cookie is always written, even in header mode, to enable the
/// cookie-first fallback on extraction. In header mode the id is
/// additionally written into the configured header.
pub(crate) fn embed_sid(
    response: &mut SessionResponse,
    sid: &str,
    expires: DateTime<Utc>,
    config: &SessionConfig,
) {
    if config.use_header {
        response.set_header(config.header_name.clone(), sid.to_owned());
    }
    response.set_cookie(SetCookie {
        name: config.cookie_name().to_owned(),
        value: sid.to_owned(),
        expires: Some(expires),
        secure: config.cookie_secure(),
        http_only: config.cookie_http_only,
        same_site: config.cookie_same_site,
        domain: config.cookie_domain.clone(),
        path: config.cookie_path.clone(),
    });
}

/// Embed a tombstone for a cleared session: an empty cookie expiring at
/// the Unix epoch, triggering client-side deletion, and no header.
pub(crate) fn embed_tombstone(response: &mut SessionResponse, config: &SessionConfig) {
    if config.use_header {
        response.remove_header(&config.header_name);
    }
    response.set_cookie(SetCookie {
        name: config.cookie_name().to_owned(),
        value: String::new(),
        expires: Some(DateTime::<Utc>::UNIX_EPOCH),
        secure: config.cookie_secure(),
        http_only: config.cookie_http_only,
        same_site: config.cookie_same_site,
        domain: config.cookie_domain.clone(),
        path: config.cookie_path.clone(),
    });
}
