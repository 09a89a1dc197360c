//! Stored collections and environments driving real executions.

use super::create_test_engine;
use rest_engine::models::PostmanCollection;
use rest_engine::{Collection, EngineConfig, Environment, ErrorKind, Request, Storage};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn named(name: &str, method: &str, url: &str) -> Request {
    let mut request = Request::new(method, url);
    request.name = name.to_string();
    request
}

#[tokio::test]
async fn test_execute_stored_request_with_stored_environment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("up"))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = EngineConfig {
        storage_dir: Some(temp_dir.path().to_path_buf()),
        ..Default::default()
    };
    let storage = Storage::from_config(&config).unwrap();

    let mut env = Environment::new("local");
    env.set("base", server.uri());
    let env_id = storage.environments().save(&mut env).unwrap();

    let mut collection = Collection::new("Service");
    let request_id = collection
        .add_request(named("Health", "GET", "{{base}}/health"))
        .unwrap();
    let collection_id = storage.collections().save(&mut collection).unwrap();

    let collection = storage.collections().load(&collection_id).unwrap();
    let env = storage.environments().load(&env_id).unwrap();
    let request = collection.find_request(&request_id).unwrap();

    let response = create_test_engine()
        .execute(request, Some(&env))
        .await
        .unwrap();
    assert_eq!(response.body, "up");
}

#[test]
fn test_postman_roundtrip_through_storage() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::new(temp_dir.path()).unwrap();

    let mut collection = Collection::new("Shop");
    collection
        .add_request(
            named("Create order", "POST", "{{base}}/orders")
                .with_header("Content-Type", "application/json")
                .with_body(r#"{"sku": "A1"}"#),
        )
        .unwrap();

    let exported = serde_json::to_string(&collection.to_postman()).unwrap();
    let parsed: PostmanCollection = serde_json::from_str(&exported).unwrap();
    let mut imported = Collection::from_postman(parsed).unwrap();
    assert_ne!(imported.id, collection.id);

    let id = storage.collections().save(&mut imported).unwrap();
    let loaded = storage.collections().load(&id).unwrap();

    assert_eq!(loaded.name, "Shop");
    assert_eq!(loaded.requests.len(), 1);
    assert_eq!(loaded.requests[0].method, "POST");
    assert_eq!(loaded.requests[0].url, "{{base}}/orders");
    assert_eq!(loaded.requests[0].body, r#"{"sku": "A1"}"#);
}

#[test]
fn test_missing_environment_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::new(temp_dir.path()).unwrap();

    let err = storage.environments().load("prod").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "environment 'prod' not found");
}
