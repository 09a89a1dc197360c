//! Authentication schemes applied to real outbound requests.

use super::{create_test_engine, create_test_environment};
use rest_engine::{AuthConfig, ErrorKind, Request};
use std::collections::HashMap;
use wiremock::matchers::{header, header_exists, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth(kind: &str, params: &[(&str, &str)]) -> AuthConfig {
    AuthConfig::new(
        kind,
        params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    )
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;
    Mock::given(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let request = Request::new("GET", server.uri())
        .with_auth(auth("basic", &[("username", "user"), ("password", "pass")]));

    assert_eq!(engine.execute(&request, None).await.unwrap().status_code, 200);
}

#[tokio::test]
async fn test_bearer_token_from_environment() {
    let server = MockServer::start().await;
    Mock::given(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let env = create_test_environment(&server.uri());
    let request = Request::new("GET", "{{base}}/me")
        .with_header("Authorization", "Basic overridden")
        .with_auth(auth("bearer", &[("token", "{{token}}")]));

    engine.execute(&request, Some(&env)).await.unwrap();
}

#[tokio::test]
async fn test_oauth2_access_token() {
    let server = MockServer::start().await;
    Mock::given(header("authorization", "Bearer at-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let request =
        Request::new("GET", server.uri()).with_auth(auth("oauth2", &[("access_token", "at-123")]));

    engine.execute(&request, None).await.unwrap();
}

#[tokio::test]
async fn test_api_key_in_header_and_query() {
    let server = MockServer::start().await;
    Mock::given(path("/h"))
        .and(header("x-api-key", "k1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/q"))
        .and(query_param("existing", "1"))
        .and(query_param("api_key", "k2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();

    let in_header = Request::new("GET", format!("{}/h", server.uri()))
        .with_auth(auth("apiKey", &[("key", "X-API-Key"), ("value", "k1"), ("in", "header")]));
    engine.execute(&in_header, None).await.unwrap();

    let in_query = Request::new("GET", format!("{}/q?existing=1", server.uri()))
        .with_auth(auth("apiKey", &[("key", "api_key"), ("value", "k2"), ("in", "query")]));
    engine.execute(&in_query, None).await.unwrap();
}

#[tokio::test]
async fn test_digest_header() {
    let server = MockServer::start().await;
    Mock::given(path("/test"))
        .and(header_regex("authorization", "^Digest username=\"u\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let request = Request::new("GET", format!("{}/test", server.uri())).with_auth(auth(
        "digest",
        &[
            ("username", "u"),
            ("password", "p"),
            ("realm", "r"),
            ("nonce", "n"),
            ("qop", "auth"),
            ("nc", "00000001"),
            ("cnonce", "c"),
        ],
    ));

    let outbound = engine.prepare(&request, None).unwrap();
    assert_eq!(
        outbound.headers()["authorization"],
        "Digest username=\"u\", realm=\"r\", nonce=\"n\", uri=\"/test\", qop=auth, nc=00000001, cnonce=\"c\", response=\"af7d00e461a9ac80af214075cdfbe627\""
    );

    engine.execute(&request, None).await.unwrap();
}

#[tokio::test]
async fn test_aws_sigv4_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header_exists("x-amz-date"))
        .and(header("x-amz-security-token", "session"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let request = Request::new("POST", format!("{}/api", server.uri()))
        .with_header("Content-Type", "application/json")
        .with_body("{}")
        .with_auth(auth(
            "awsSigV4",
            &[
                ("access_key", "AKIDTEST"),
                ("secret_key", "secret"),
                ("session_token", "session"),
                ("region", "eu-west-1"),
                ("service", "execute-api"),
            ],
        ));

    let outbound = engine.prepare(&request, None).unwrap();
    let authorization = outbound.headers()["authorization"].to_str().unwrap();
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDTEST/"));
    assert!(authorization.contains("/eu-west-1/execute-api/aws4_request"));
    assert!(authorization
        .contains("SignedHeaders=content-type;host;x-amz-date;x-amz-security-token,"));

    engine.execute(&request, None).await.unwrap();
}

#[tokio::test]
async fn test_missing_param_never_reaches_server() {
    let server = MockServer::start().await;
    let engine = create_test_engine();
    let request = Request::new("GET", server.uri())
        .with_auth(auth("apiKey", &[("key", "X-API-Key"), ("in", "header")]));

    let err = engine.execute(&request, None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("auth.params.value"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_auth_type() {
    let engine = create_test_engine();
    let request = Request::new("GET", "http://127.0.0.1:9/").with_auth(auth("hawk", &[]));

    let err = engine.execute(&request, None).await.unwrap_err();
    assert_eq!(err.field(), Some("auth.type"));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_aws_sigv4_sends_the_signed_query() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .and(query_param("q", "a b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let request = Request::new("GET", format!("{}/search", server.uri()))
        .with_query("q", "a b")
        .with_auth(auth(
            "awsSigV4",
            &[
                ("access_key", "AKIDTEST"),
                ("secret_key", "secret"),
                ("region", "eu-west-1"),
                ("service", "execute-api"),
            ],
        ));

    engine.execute(&request, None).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), Some("q=a%20b"));
}
