//! Request decoration as seen by the server.

use std::time::Duration;

use htprobe::config::ConnectionSetup;
use htprobe::fetch::{walk, BasicAuth, Cookie, RequestExecutor, RequestTemplate};
use htprobe::ProbeError;
use httptest::{all_of, matchers::*, responders::*, Expectation, Server};
use url::Url;

fn executor() -> RequestExecutor {
    htprobe::initialization::init_crypto_provider();
    let setup = ConnectionSetup::new(Duration::from_secs(5), None, false, true, false);
    RequestExecutor::new(&setup).expect("Failed to build executor")
}

#[tokio::test]
async fn test_agent_language_and_extra_headers_are_sent() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/"),
            request::headers(contains(("user-agent", "probe-test/1.0"))),
            request::headers(contains(("accept-language", "de-DE"))),
            request::headers(contains(("x-trace", "12:30:00"))),
        ])
        .respond_with(status_code(204)),
    );

    let template = RequestTemplate {
        agent: "probe-test/1.0".into(),
        lang: "de-DE".into(),
        extra_headers: vec!["X-Trace: 12:30:00".into()],
        ..Default::default()
    };
    let url = Url::parse(&server.url_str("/")).unwrap();
    let hops = walk(&executor(), template.for_url(url), true).await.unwrap();

    assert_eq!(hops[0].response.status, 204);
    let sent = &hops[0].request.headers;
    assert_eq!(sent["user-agent"], "probe-test/1.0");
    assert_eq!(sent["x-trace"], "12:30:00");
}

#[tokio::test]
async fn test_basic_auth_and_supplied_cookies_are_sent() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/private"),
            request::headers(contains(("authorization", "Basic dXNlcjpwYXNz"))),
            request::headers(contains(("cookie", "theme=dark; lang=en"))),
        ])
        .respond_with(status_code(200)),
    );

    let template = RequestTemplate {
        auth: Some(BasicAuth {
            user: "user".into(),
            pass: "pass".into(),
        }),
        cookies: vec![Cookie::new("theme", "dark"), Cookie::new("lang", "en")],
        ..Default::default()
    };
    let url = Url::parse(&server.url_str("/private")).unwrap();
    let hops = walk(&executor(), template.for_url(url), true).await.unwrap();

    let sent = hops[0].request.cookies();
    assert_eq!(sent, vec![Cookie::new("theme", "dark"), Cookie::new("lang", "en")]);
}

#[tokio::test]
async fn test_empty_credentials_are_not_sent() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/"),
            not(request::headers(contains(key("authorization")))),
        ])
        .respond_with(status_code(200)),
    );

    let template = RequestTemplate {
        auth: Some(BasicAuth {
            user: "user".into(),
            pass: String::new(),
        }),
        ..Default::default()
    };
    let url = Url::parse(&server.url_str("/")).unwrap();
    walk(&executor(), template.for_url(url), true).await.unwrap();
}

#[tokio::test]
async fn test_malformed_extra_header_is_rejected_before_sending() {
    let template = RequestTemplate {
        extra_headers: vec!["no separator here".into()],
        ..Default::default()
    };
    let url = Url::parse("http://127.0.0.1:9/").unwrap();
    let error = walk(&executor(), template.for_url(url), true).await.unwrap_err();
    assert!(matches!(error, ProbeError::InvalidHeader(_)));
}
