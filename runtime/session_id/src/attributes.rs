use crate::request::RequestHead;
use crate::vars::{RequestVars, SESSION_EMAIL, SESSION_NAME, SESSION_ROLE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// The attributes attached to a session.
pub struct SessionAttributes {
    /// Defaults to [`DEFAULT_ROLE`](crate::DEFAULT_ROLE).
    pub role: String,
    pub name: String,
    pub email: String,
}

impl Default for SessionAttributes {
    fn default() -> Self {
        Self {
            role: crate::DEFAULT_ROLE.to_owned(),
            name: String::new(),
            email: String::new(),
        }
    }
}

impl SessionAttributes {
    /// Write the attributes into the request-scoped variables, under the
    /// [`SESSION_ROLE`], [`SESSION_NAME`] and [`SESSION_EMAIL`] keys.
    pub fn publish(&self, vars: &mut RequestVars) {
        vars.set(SESSION_ROLE, self.role.as_str());
        vars.set(SESSION_NAME, self.name.as_str());
        vars.set(SESSION_EMAIL, self.email.as_str());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Values that should overwrite the attributes of the current session.
///
/// A `None` field leaves the corresponding attribute untouched.
/// Empty strings are never stored in here: they are treated as "not provided".
pub struct AttributeOverrides {
    role: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

impl AttributeOverrides {
    /// The query parameter used to overwrite the session role.
    pub const ROLE_PARAM: &'static str = "setrole";
    /// The query parameter used to overwrite the session name.
    pub const NAME_PARAM: &'static str = "setname";
    /// The query parameter used to overwrite the session email.
    pub const EMAIL_PARAM: &'static str = "setemail";

    /// No overrides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Extract overrides from the `setrole`, `setname` and `setemail` query parameters.
    ///
    /// Content is not validated in any way.
    pub fn from_request(request_head: &RequestHead) -> Self {
        let param = |name: &str| request_head.query_param(name).map(|v| v.into_owned());
        Self::none()
            .role(param(Self::ROLE_PARAM))
            .name(param(Self::NAME_PARAM))
            .email(param(Self::EMAIL_PARAM))
    }

    pub fn role(mut self, role: Option<String>) -> Self {
        self.role = role.filter(|v| !v.is_empty());
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|v| !v.is_empty());
        self
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|v| !v.is_empty());
        self
    }

    /// `true` if applying these overrides would leave every attribute unchanged.
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.name.is_none() && self.email.is_none()
    }

    fn apply_to(&self, attributes: &mut SessionAttributes) {
        if let Some(role) = &self.role {
            attributes.role.clone_from(role);
        }
        if let Some(name) = &self.name {
            attributes.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            attributes.email.clone_from(email);
        }
    }
}

#[derive(Clone, Default)]
/// A process-wide, in-memory map from session tokens to [`SessionAttributes`].
///
/// Cloning the store is cheap: all clones share the same underlying map.
///
/// Every operation acquires the store lock exactly once, so that a lookup
/// (or creation) and the following update are observed atomically
/// by concurrent requests for the same session.
///
/// # Limitations
///
/// Records are never evicted: memory usage grows with the number of sessions
/// seen since the store was created. Use [`AttributeStore::len`] to keep an eye on it.\
/// This store won't persist data between server restarts.
/// It also won't synchronize data between multiple server instances.
pub struct AttributeStore(Arc<Mutex<HashMap<String, SessionAttributes>>>);

impl std::fmt::Debug for AttributeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeStore").finish_non_exhaustive()
    }
}

impl AttributeStore {
    /// Creates a new (empty) attribute store.
    pub fn new() -> Self {
        Self::default()
    }

    // The map is left consistent by every critical section, so a panic
    // while holding the lock doesn't invalidate its content.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionAttributes>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_insert<'a>(
        records: &'a mut HashMap<String, SessionAttributes>,
        token: &str,
    ) -> &'a mut SessionAttributes {
        records.entry(token.to_owned()).or_insert_with(|| {
            tracing::trace!("Creating attribute record for a new session");
            SessionAttributes::default()
        })
    }

    /// Returns the attributes attached to `token`.
    ///
    /// A record with default attributes is created if this is the first
    /// time the store sees `token`.
    #[tracing::instrument(name = "Load session attributes", level = tracing::Level::TRACE, skip_all)]
    pub fn get_or_create(&self, token: &str) -> SessionAttributes {
        let mut guard = self.lock();
        Self::get_or_insert(&mut guard, token).clone()
    }

    /// Apply `overrides` to the attributes attached to `token`, creating
    /// a default record first if there is none.
    ///
    /// It returns the attributes as they are after the update.
    #[tracing::instrument(name = "Update session attributes", level = tracing::Level::TRACE, skip_all)]
    pub fn apply_overrides(&self, token: &str, overrides: &AttributeOverrides) -> SessionAttributes {
        let mut guard = self.lock();
        let record = Self::get_or_insert(&mut guard, token);
        overrides.apply_to(record);
        record.clone()
    }

    /// The number of sessions with an attribute record.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
