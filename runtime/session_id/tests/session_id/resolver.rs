use crate::fixtures::RequestFixture;
use biscotti::{Processor, ProcessorConfig};
use googletest::{
    assert_that,
    prelude::{eq, none, some},
};
use itertools::Itertools;
use session_id::request::extract_request_cookies;
use session_id::vars::SESSION_ID;
use session_id::{
    RequestVars, SESSION_COOKIE_NAME, SessionIdConfig, SessionOrigin, SessionResolver,
    SessionToken,
};

fn processor() -> Processor {
    let mut config = ProcessorConfig::default();
    config.percent_encode = false;
    config.into()
}

fn resolver(cookie_domain: &str) -> SessionResolver {
    SessionResolver::new(SessionIdConfig::new(cookie_domain))
}

#[test]
fn the_resolver_keeps_its_configuration() {
    let resolver = resolver("example.com");
    assert_eq!(resolver.config(), &SessionIdConfig::new("example.com"));
}

fn resolve(resolver: &SessionResolver, request: &RequestFixture) -> session_id::ResolvedSession {
    let head = request.build();
    let processor = processor();
    let cookies = extract_request_cookies(&head, &processor);
    resolver.resolve(&head, &cookies)
}

#[test]
fn a_new_token_is_minted_when_there_is_no_session_cookie() {
    let resolver = resolver("example.com");
    let session = resolve(&resolver, &RequestFixture::default().host("www.example.com"));

    assert_eq!(session.origin(), SessionOrigin::NewlyMinted);
    // Canonical format: 32 lowercase hex characters.
    assert!(SessionToken::parse(session.token()).is_ok());

    let cookie = session.cookie();
    assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
    assert_eq!(cookie.value(), session.token());
    assert_that!(session.domain(), some(eq("example.com")));
}

#[test]
fn an_existing_session_cookie_is_reused_verbatim() {
    let resolver = resolver("example.com");
    let token = "my-very-own-token";
    let request = RequestFixture::default()
        .host("www.example.com")
        .session_cookie(token);

    let session = resolve(&resolver, &request);

    assert_eq!(session.origin(), SessionOrigin::Existing);
    assert_eq!(session.token(), token);
    let cookie = session.cookie();
    assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
    assert_eq!(cookie.value(), token);
    // No domain recomputation for reused cookies.
    assert_that!(session.domain(), none());
}

#[test]
fn resolution_is_idempotent_for_requests_carrying_the_same_cookie() {
    let resolver = resolver("");
    let first = resolve(&resolver, &RequestFixture::default().host("localhost"));
    let request = RequestFixture::default()
        .host("localhost")
        .session_cookie(first.token());

    for _ in 0..3 {
        let session = resolve(&resolver, &request);
        assert_eq!(session.token(), first.token());
        assert_eq!(session.origin(), SessionOrigin::Existing);
    }
}

#[test]
fn session_cookie_is_found_among_other_cookies() {
    let resolver = resolver("");
    let request = RequestFixture::default()
        .host("localhost")
        .cookie_header(&format!("theme=dark; {SESSION_COOKIE_NAME}=abc; lang=en"));

    let session = resolve(&resolver, &request);

    assert_eq!(session.token(), "abc");
}

#[test]
fn an_empty_session_cookie_is_ignored() {
    let resolver = resolver("");
    let request = RequestFixture::default()
        .host("localhost")
        .session_cookie("");

    let session = resolve(&resolver, &request);

    assert_eq!(session.origin(), SessionOrigin::NewlyMinted);
    assert!(!session.token().is_empty());
}

#[test]
fn fresh_tokens_never_collide() {
    let resolver = resolver("example.com");
    let request = RequestFixture::default().host("example.com");
    let tokens = (0..1000)
        .map(|_| resolve(&resolver, &request).token().to_owned())
        .collect_vec();
    assert_eq!(tokens.iter().unique().count(), tokens.len());
}

#[test]
fn cookie_domain_is_the_configured_one_if_the_host_belongs_to_it() {
    let cases = [
        ("example.com", "sub.example.com", Some("example.com")),
        ("example.com", "example.com", Some("example.com")),
        ("example.com", "other.org", Some("other.org")),
        ("example.com", "example.com:8080", Some("example.com:8080")),
        ("", "other.org", Some("other.org")),
        // No host at all: the cookie is left without a `Domain` attribute.
        ("example.com", "", None),
    ];
    for (configured, host, expected) in cases {
        let resolver = resolver(configured);
        let mut request = RequestFixture::default();
        if !host.is_empty() {
            request = request.host(host);
        }
        let session = resolve(&resolver, &request);
        assert_eq!(
            session.domain(),
            expected,
            "configured: {configured:?}, host: {host:?}"
        );
    }
}

#[test]
fn token_is_published_under_the_session_id_key() {
    let resolver = resolver("");
    let session = resolve(&resolver, &RequestFixture::default().host("localhost"));

    let mut vars = RequestVars::new();
    session.publish(&mut vars);

    assert_eq!(vars.get(SESSION_ID), Some(session.token()));
}
