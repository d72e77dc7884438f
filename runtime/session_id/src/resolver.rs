use crate::config::SessionIdConfig;
use crate::request::RequestHead;
use crate::vars::{RequestVars, SESSION_ID};
use crate::{SESSION_COOKIE_NAME, SessionToken};
use biscotti::{RequestCookies, ResponseCookie};

#[derive(Debug, Clone)]
/// Determines which session a request belongs to.
///
/// Built once, from a [`SessionIdConfig`], and shared by all requests.
pub struct SessionResolver {
    config: SessionIdConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where the token of a [`ResolvedSession`] comes from.
pub enum SessionOrigin {
    /// The request carried a session cookie, its value was reused.
    Existing,
    /// The request had no session cookie, a new token was minted.
    NewlyMinted,
}

#[derive(Debug, Clone)]
/// The outcome of [`SessionResolver::resolve`].
pub struct ResolvedSession {
    token: String,
    origin: SessionOrigin,
    domain: Option<String>,
    cookie: ResponseCookie<'static>,
}

impl SessionResolver {
    pub fn new(config: SessionIdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionIdConfig {
        &self.config
    }

    /// Determine the session token for the incoming request.
    ///
    /// If the request carries a non-empty `x-caddy-sessionid` cookie, its value is
    /// reused verbatim and the cookie is sent back as it was received,
    /// i.e. without any attribute.
    ///
    /// Otherwise a new token is minted and a new cookie is built for it,
    /// with `Path=/` and the `Domain` computed by [`cookie_domain`].
    /// The cookie has no expiration: it lives as long as the browser session.
    pub fn resolve(
        &self,
        request_head: &RequestHead,
        request_cookies: &RequestCookies<'_>,
    ) -> ResolvedSession {
        if let Some(cookie) = request_cookies.get(SESSION_COOKIE_NAME) {
            if !cookie.value().is_empty() {
                let token = cookie.value().to_owned();
                return ResolvedSession {
                    cookie: ResponseCookie::new(SESSION_COOKIE_NAME, token.clone()),
                    token,
                    origin: SessionOrigin::Existing,
                    domain: None,
                };
            }
            tracing::debug!("Ignoring an empty session cookie");
        }

        let host = request_head.host();
        let domain = cookie_domain(&self.config.cookie_domain, host);
        tracing::debug!(
            configured_domain = %self.config.cookie_domain,
            host = %host,
            "Minting a new session token"
        );
        let token = SessionToken::random().to_string();
        let domain = (!domain.is_empty()).then(|| domain.to_owned());
        let mut cookie = ResponseCookie::new(SESSION_COOKIE_NAME, token.clone()).set_path("/");
        if let Some(domain) = &domain {
            cookie = cookie.set_domain(domain.clone());
        }
        ResolvedSession {
            token,
            origin: SessionOrigin::NewlyMinted,
            domain,
            cookie,
        }
    }
}

impl ResolvedSession {
    /// The session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    /// The cookie to be sent back to the client.
    pub fn cookie(&self) -> &ResponseCookie<'static> {
        &self.cookie
    }

    /// The `Domain` attribute of the session cookie, if it has one.
    ///
    /// It's always `None` for reused cookies.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Expose the session token to later stages via the [`SESSION_ID`] key.
    pub fn publish(&self, vars: &mut RequestVars) {
        vars.set(SESSION_ID, self.token.as_str());
    }

    pub fn into_cookie(self) -> ResponseCookie<'static> {
        self.cookie
    }
}

/// Choose the `Domain` attribute for a new session cookie.
///
/// The configured domain is used if the request host ends with it.
/// The request host is used otherwise, to avoid scoping the cookie to a domain
/// that has nothing to do with the server. An empty configured domain never matches.
///
/// ```rust
/// use session_id::cookie_domain;
///
/// assert_eq!(cookie_domain("example.com", "sub.example.com"), "example.com");
/// assert_eq!(cookie_domain("example.com", "other.org"), "other.org");
/// assert_eq!(cookie_domain("", "other.org"), "other.org");
/// ```
pub fn cookie_domain<'a>(configured: &'a str, host: &'a str) -> &'a str {
    if !configured.is_empty() && host.ends_with(configured) {
        configured
    } else {
        host
    }
}
