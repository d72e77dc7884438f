//! Request-scoped variables, used to hand session data over to later processing stages.
use std::collections::BTreeMap;

/// The key holding the session token.
pub const SESSION_ID: &str = "http.session_id";
/// The key holding the role attached to the session.
pub const SESSION_ROLE: &str = "http.session_role";
/// The key holding the display name attached to the session.
pub const SESSION_NAME: &str = "http.session_name";
/// The key holding the contact address attached to the session.
pub const SESSION_EMAIL: &str = "http.session_email";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A set of string variables scoped to a single request.
///
/// Earlier stages of the request processing pipeline write into it,
/// later stages read from it.
/// It is passed by value along the pipeline: there is no ambient, global state.
///
/// # Example
///
/// ```rust
/// use session_id::vars::{RequestVars, SESSION_ROLE};
///
/// let mut vars = RequestVars::new();
/// vars.set(SESSION_ROLE, "admin");
/// assert_eq!(vars.get(SESSION_ROLE), Some("admin"));
/// ```
pub struct RequestVars(BTreeMap<String, String>);

impl RequestVars {
    /// Create an empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    ///
    /// If `key` was already set, its previous value is returned.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get the value associated with `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate over all the variables, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestVars
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
