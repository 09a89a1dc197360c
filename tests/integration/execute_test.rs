//! End-to-end execution tests against a local mock server.

use super::{create_test_engine, create_test_environment, init_test_env};
use rest_engine::{AuthConfig, EngineConfig, ErrorKind, Request, RequestEngine};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_execute_substitutes_and_sends_everything() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items/42"))
        .and(query_param("verbose", "true"))
        .and(header("x-trace", "42"))
        .and(body_string(r#"{"id": 42}"#))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"created": true}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let env = create_test_environment(&server.uri());
    let request = Request::new("POST", "{{base}}/items/{{id}}")
        .with_query("verbose", "true")
        .with_header("X-Trace", "{{id}}")
        .with_body(r#"{"id": {{id}}}"#);

    let response = engine.execute(&request, Some(&env)).await.unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.body, r#"{"created": true}"#);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_execute_keeps_first_header_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "a=1")
                .append_header("set-cookie", "b=2"),
        )
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let response = engine
        .execute(&Request::new("GET", server.uri()), None)
        .await
        .unwrap();

    assert_eq!(response.headers.get("Set-Cookie").map(String::as_str), Some("a=1"));
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let response = engine
        .execute(&Request::new("GET", format!("{}/missing", server.uri())), None)
        .await
        .unwrap();

    assert_eq!(response.status_code, 404);
    assert!(!response.is_success());
    assert_eq!(response.body, "not here");
}

#[tokio::test]
async fn test_existing_query_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .and(query_param("q", "a b"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let request = Request::new("GET", format!("{}/search?q=a%20b", server.uri())).with_query("page", "2");
    engine.execute(&request, None).await.unwrap();
}

#[tokio::test]
async fn test_invalid_method_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("INVALID"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let err = engine
        .execute(&Request::new("INVALID", server.uri()), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("method"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ntlm_never_reaches_server() {
    let server = MockServer::start().await;
    let engine = create_test_engine();
    let request = Request::new("GET", server.uri()).with_auth(AuthConfig::new("ntlm", HashMap::new()));

    let err = engine.execute(&request, None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotImplemented);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unresolved_url_is_validation_error() {
    let engine = create_test_engine();
    let err = engine
        .execute(&Request::new("GET", "{{base}}/users"), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("url"));
}

#[tokio::test]
async fn test_timeout_is_execution_error() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = EngineConfig {
        timeout: 200,
        ..Default::default()
    };
    let engine = RequestEngine::new(&config).unwrap();

    let err = engine
        .execute(&Request::new("GET", server.uri()), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Execution);
    assert!(err.is_timeout());
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_redirects_follow_config() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let request = Request::new("GET", format!("{}/old", server.uri()));

    let following = create_test_engine();
    let response = following.execute(&request, None).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "moved");

    let config = EngineConfig {
        follow_redirects: false,
        ..Default::default()
    };
    let not_following = RequestEngine::new(&config).unwrap();
    let response = not_following.execute(&request, None).await.unwrap();
    assert_eq!(response.status_code, 302);
}

#[tokio::test]
async fn test_default_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(header(
        "user-agent",
        concat!("rest-engine/", env!("CARGO_PKG_VERSION")),
    ))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&server)
    .await;

    let engine = create_test_engine();
    let response = engine
        .execute(&Request::new("GET", server.uri()), None)
        .await
        .unwrap();
    assert_eq!(response.status_code, 204);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_concurrent_executions_share_engine() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(8)
        .mount(&server)
        .await;

    let engine = create_test_engine();
    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        let url = format!("{}/n/{}", server.uri(), i);
        handles.push(tokio::spawn(async move {
            engine.execute(&Request::new("GET", url), None).await
        }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.body, "ok");
    }
}

#[tokio::test]
async fn test_free_execute_function() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("default"))
        .mount(&server)
        .await;

    let response = rest_engine::execute(&Request::new("GET", server.uri()), None)
        .await
        .unwrap();
    assert_eq!(response.body, "default");
}
