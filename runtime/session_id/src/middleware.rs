use crate::config::{DirectiveError, SessionIdConfig};
use crate::request::{RequestHead, extract_request_cookies};
use crate::resolver::{ResolvedSession, SessionResolver};
use crate::vars::{RequestVars, SESSION_ID};
use crate::{AttributeOverrides, AttributeStore};
use biscotti::{Processor, ProcessorConfig, ResponseCookies};
use http::HeaderValue;
use http::header::SET_COOKIE;
use std::future::Future;
use tracing::Instrument;
use tracing_log_error::fields::{ERROR_DETAILS, ERROR_MESSAGE, error_details, error_message};

/// A handle to trigger the execution of the rest of the request processing pipeline.
///
/// It receives the [`RequestVars`] populated by [`SessionIdMiddleware`] and
/// returns either a response or an error. Errors are forwarded to the caller, unchanged.
pub struct Next<C> {
    request_pipeline: C,
}

impl<C> Next<C> {
    /// Creates a new [`Next`] instance.
    pub fn new(request_pipeline: C) -> Self {
        Self { request_pipeline }
    }

    /// Run the rest of the request processing pipeline.
    pub async fn run<Fut, B, E>(self, vars: RequestVars) -> Result<http::Response<B>, E>
    where
        C: FnOnce(RequestVars) -> Fut,
        Fut: Future<Output = Result<http::Response<B>, E>>,
    {
        (self.request_pipeline)(vars).await
    }
}

/// A wrapping middleware that attaches a session, and its attributes, to every request.
///
/// For each request it:
///
/// 1. Resolves the session token, reusing the one in the session cookie if there is one
///    (see [`SessionResolver::resolve`]).
/// 2. Publishes the token under the `http.session_id` key.
/// 3. Loads (or creates) the session attributes and applies the overrides from
///    the `setrole`, `setname` and `setemail` query parameters.
/// 4. Publishes the attributes under the `http.session_role`, `http.session_name`
///    and `http.session_email` keys.
/// 5. Invokes the rest of the pipeline and attaches the session cookie to its response.
///
/// # Example
///
/// ```rust
/// use session_id::{AttributeStore, Next, RequestVars, SessionIdMiddleware};
/// use session_id::vars::SESSION_ROLE;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let middleware = SessionIdMiddleware::from_directive(
///     "session_id example.com",
///     AttributeStore::new(),
/// )?;
///
/// let (head, _) = http::Request::get("https://www.example.com/?setrole=admin")
///     .header("host", "www.example.com")
///     .body(())?
///     .into_parts();
/// let next = Next::new(|vars: RequestVars| async move {
///     let role = vars.get(SESSION_ROLE).unwrap_or_default().to_owned();
///     Ok::<_, std::convert::Infallible>(http::Response::new(role))
/// });
/// let response = middleware.handle(&head.into(), RequestVars::new(), next).await?;
/// assert_eq!(response.body(), "admin");
/// assert!(response.headers().contains_key("set-cookie"));
/// # Ok(())
/// # }
/// ```
pub struct SessionIdMiddleware {
    resolver: SessionResolver,
    store: AttributeStore,
    processor: Processor,
}

impl std::fmt::Debug for SessionIdMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdMiddleware")
            .field("resolver", &self.resolver)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl SessionIdMiddleware {
    /// Build the middleware with a cookie processor that leaves cookie names
    /// and values untouched: the session cookie value is used as the token
    /// byte for byte, without percent-decoding.
    pub fn new(config: SessionIdConfig, store: AttributeStore) -> Self {
        let mut processor_config = ProcessorConfig::default();
        processor_config.percent_encode = false;
        Self::with_processor(config, store, processor_config.into())
    }

    /// Build the middleware using a custom cookie [`Processor`], e.g. to sign
    /// or encrypt the session cookie.
    ///
    /// The token is whatever value the processor extracts from the session cookie:
    /// a processor with `percent_encode` enabled publishes the decoded value.
    pub fn with_processor(
        config: SessionIdConfig,
        store: AttributeStore,
        processor: Processor,
    ) -> Self {
        Self {
            resolver: SessionResolver::new(config),
            store,
            processor,
        }
    }

    /// Build the middleware out of a `session_id <cookie_domain>` directive.
    ///
    /// It fails if the directive is malformed: the middleware can't be built
    /// without a valid configuration.
    pub fn from_directive(directive: &str, store: AttributeStore) -> Result<Self, DirectiveError> {
        let config = SessionIdConfig::from_directive(directive)?;
        Ok(Self::new(config, store))
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Resolve the session for the incoming request and publish its token
    /// and attributes into `vars`.
    ///
    /// It returns the resolved session, whose cookie must be sent back to the client.
    pub fn prepare(&self, request_head: &RequestHead, vars: &mut RequestVars) -> ResolvedSession {
        let cookies = extract_request_cookies(request_head, &self.processor);
        let session = self.resolver.resolve(request_head, &cookies);
        session.publish(vars);

        let overrides = AttributeOverrides::from_request(request_head);
        let attributes = self.store.apply_overrides(session.token(), &overrides);
        attributes.publish(vars);
        session
    }

    /// Process a request, delegating to `next` once the session is in place.
    ///
    /// The session cookie is appended to the response returned by `next`.
    /// If `next` fails, its error is returned as-is.
    pub async fn handle<C, Fut, B, E>(
        &self,
        request_head: &RequestHead,
        mut vars: RequestVars,
        next: Next<C>,
    ) -> Result<http::Response<B>, E>
    where
        C: FnOnce(RequestVars) -> Fut,
        Fut: Future<Output = Result<http::Response<B>, E>>,
    {
        let session = self.prepare(request_head, &mut vars);
        let span = tracing::trace_span!(
            "session_id",
            { SESSION_ID } = session.token(),
            session.origin = ?session.origin(),
        );
        let mut response = next.run(vars).instrument(span).await?;
        self.inject_session_cookie(&mut response, session);
        Ok(response)
    }

    /// Append the session cookie to `response`, via the `Set-Cookie` header.
    pub fn inject_session_cookie<B>(&self, response: &mut http::Response<B>, session: ResolvedSession) {
        let mut cookies = ResponseCookies::new();
        cookies.insert(session.into_cookie());
        for value in cookies.header_values(&self.processor) {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => {
                    tracing::event!(
                        tracing::Level::ERROR,
                        { ERROR_MESSAGE } = error_message(&e),
                        { ERROR_DETAILS } = error_details(&e),
                        "The session cookie is not a valid `Set-Cookie` header value, skipping it."
                    );
                }
            }
        }
    }
}
