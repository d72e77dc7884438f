use session_id::{AttributeStore, RequestHead, SESSION_COOKIE_NAME, SessionIdConfig, SessionIdMiddleware};

/// A middleware with the given cookie domain and an empty attribute store.
pub fn middleware(cookie_domain: &str) -> SessionIdMiddleware {
    SessionIdMiddleware::new(SessionIdConfig::new(cookie_domain), AttributeStore::new())
}

/// A helper to build the head of an incoming request.
#[derive(Default)]
pub struct RequestFixture {
    pub host: Option<String>,
    pub query: Option<String>,
    pub session_cookie: Option<String>,
    pub extra_cookie_header: Option<String>,
}

impl RequestFixture {
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_owned());
        self
    }

    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_owned());
        self
    }

    pub fn session_cookie(mut self, token: &str) -> Self {
        self.session_cookie = Some(token.to_owned());
        self
    }

    pub fn cookie_header(mut self, header: &str) -> Self {
        self.extra_cookie_header = Some(header.to_owned());
        self
    }

    pub fn build(&self) -> RequestHead {
        let uri = match &self.query {
            Some(query) => format!("/?{query}"),
            None => "/".to_owned(),
        };
        let mut builder = http::Request::get(uri);
        if let Some(host) = &self.host {
            builder = builder.header(http::header::HOST, host);
        }
        if let Some(token) = &self.session_cookie {
            builder = builder.header(
                http::header::COOKIE,
                format!("{SESSION_COOKIE_NAME}={token}"),
            );
        }
        if let Some(header) = &self.extra_cookie_header {
            builder = builder.header(http::header::COOKIE, header);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts.into()
    }
}
