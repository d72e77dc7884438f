//! The parts of an incoming request that the session middleware looks at.
use biscotti::{Processor, RequestCookies};
use http::header::{COOKIE, HOST};
use http::{HeaderMap, Method, Uri, Version};
use std::borrow::Cow;
use tracing_log_error::fields::{ERROR_DETAILS, ERROR_MESSAGE, error_details, error_message};

#[non_exhaustive]
#[derive(Debug)]
/// All the information that is transmitted as part of an HTTP request ahead of the body.
///
/// It includes the [method](Method), the [URI](Uri),
/// the [HTTP version](Version), and the [headers](HeaderMap).
pub struct RequestHead {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        Self {
            method: parts.method,
            target: parts.uri,
            version: parts.version,
            headers: parts.headers,
        }
    }
}

impl RequestHead {
    /// The host targeted by the request, port included (if specified).
    ///
    /// It's taken from the `Host` header or, if that's missing or not valid UTF-8,
    /// from the authority of the request target (e.g. for HTTP/2 requests).
    /// It's empty if neither is available.
    pub fn host(&self) -> &str {
        if let Some(host) = self.headers.get(HOST).and_then(|h| h.to_str().ok()) {
            return host;
        }
        self.target
            .authority()
            .map(|authority| authority.as_str())
            .unwrap_or_default()
    }

    /// The first value for the query parameter named `name`, percent-decoded.
    ///
    /// It returns `None` if the parameter doesn't appear in the query string.
    pub fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        let query = self.target.query()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Parse cookies out of the incoming request.
///
/// All `Cookie` headers are taken into account.
/// Each `name=value` pair is parsed on its own: a malformed pair is skipped,
/// with a warning, without affecting the other cookies in the same header.
pub fn extract_request_cookies<'request>(
    request_head: &'request RequestHead,
    processor: &Processor,
) -> RequestCookies<'request> {
    let mut cookies = RequestCookies::new();
    for header in request_head.headers.get_all(COOKIE) {
        let header = match header.to_str() {
            Ok(header) => header,
            Err(e) => {
                log_skipped_cookies(&errors::ExtractRequestCookiesError::from(e));
                continue;
            }
        };
        for pair in header.split(';') {
            if let Err(e) = cookies.extend_from_header(pair, processor) {
                log_skipped_cookies(&errors::ExtractRequestCookiesError::from(e));
            }
        }
    }
    cookies
}

fn log_skipped_cookies(e: &errors::ExtractRequestCookiesError) {
    tracing::event!(
        tracing::Level::WARN,
        { ERROR_MESSAGE } = error_message(e),
        { ERROR_DETAILS } = error_details(e),
        "Skipping a malformed entry in the `Cookie` header"
    );
}

pub mod errors {
    //! Errors that can occur when parsing the incoming request.
    use http::header::ToStrError;

    #[non_exhaustive]
    #[derive(Debug, thiserror::Error)]
    /// Why [`extract_request_cookies`](super::extract_request_cookies) skipped
    /// (part of) a `Cookie` header.
    pub enum ExtractRequestCookiesError {
        #[error("Some characters in the `Cookie` header aren't printable ASCII characters.")]
        InvalidHeaderValue(#[from] ToStrError),
        #[error("Failed to parse a request cookie out of the `Cookie` header.")]
        ParseError(#[from] biscotti::errors::ParseError),
    }
}
