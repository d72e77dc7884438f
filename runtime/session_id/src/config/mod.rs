//! Configuration for the session middleware.
//!
//! There are two ways to build a [`SessionIdConfig`]:
//!
//! - From a one-line directive, `session_id <cookie_domain>`, via [`SessionIdConfig::from_directive`].
//! - From a YAML file and/or environment variables, via [`SessionIdConfig::load`].
//!
//! Either way, a malformed configuration is reported as an error before any
//! request is served.
mod directive;
mod loader;

pub use directive::DirectiveError;
pub use loader::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure how session cookies are scoped.
pub struct SessionIdConfig {
    /// The domain new session cookies should be scoped to.
    ///
    /// It's only used when the request host ends with it: otherwise the request host
    /// is used as the cookie domain.
    ///
    /// By default, it's empty: cookies are always scoped to the request host.
    #[serde(default)]
    pub cookie_domain: String,
}

impl SessionIdConfig {
    /// Create a configuration with the given cookie domain.
    pub fn new(cookie_domain: impl Into<String>) -> Self {
        Self {
            cookie_domain: cookie_domain.into(),
        }
    }
}
