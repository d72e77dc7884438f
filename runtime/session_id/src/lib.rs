/*!
Durable session identifiers for HTTP requests, with a small set of mutable
per-session attributes.

# How it works

Every request that goes through [`SessionIdMiddleware`] ends up with a **session token**:

- If the request carries a `x-caddy-sessionid` cookie, its value is reused as-is.
- Otherwise a fresh token is minted (a random UUID rendered as 32 lowercase hex characters)
  and a new cookie is built for it, scoped to the configured cookie domain
  (or to the request host, if the host doesn't belong to that domain).

The cookie is sent back on every response, using the `Set-Cookie` header.

The token is then used as a key into the [`AttributeStore`], a process-wide map
holding a [`SessionAttributes`] record (role, name, email) for each session.
A record is created on first access, with the `anon` role.
The `setrole`, `setname` and `setemail` query parameters, when present and non-empty,
overwrite the corresponding field.

Finally, the token and the attributes are published into the [`RequestVars`] handed
over to the next stage of the request processing pipeline, under the
`http.session_id`, `http.session_role`, `http.session_name` and `http.session_email` keys.

# Limitations

Attribute records are never evicted: the store grows with the number of sessions
seen since the process started.\
Nothing is persisted across restarts, nor shared between processes.\
Identity claims are never verified: any client can set its own role.
*/
pub mod config;
mod attributes;
mod middleware;
pub mod request;
mod resolver;
mod token;
pub mod vars;

pub use attributes::{AttributeOverrides, AttributeStore, SessionAttributes};
pub use config::SessionIdConfig;
pub use middleware::{Next, SessionIdMiddleware};
pub use request::RequestHead;
pub use resolver::{ResolvedSession, SessionOrigin, SessionResolver, cookie_domain};
pub use token::{InvalidSessionToken, SessionToken};
pub use vars::RequestVars;

/// The name of the cookie used to carry the session token.
pub const SESSION_COOKIE_NAME: &str = "x-caddy-sessionid";

/// The identifier of the handler, as seen by the host server.
pub const HANDLER_ID: &str = "http.handlers.session_id";

/// The name of the configuration directive, i.e. `session_id <cookie_domain>`.
pub const DIRECTIVE: &str = "session_id";

/// The role assigned to a session until it is overwritten via `setrole`.
pub const DEFAULT_ROLE: &str = "anon";
