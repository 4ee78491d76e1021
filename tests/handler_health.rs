mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use link_registry::AppState;
use link_registry::api::handlers::health_handler;
use link_registry::infrastructure::persistence::FileUrlRepository;
use std::sync::Arc;

fn health_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = health_server(common::create_test_state());

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert!(json["checks"]["storage"].get("message").is_none());
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = health_server(common::create_test_state());

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("storage").is_some());
}

#[tokio::test]
async fn test_health_endpoint_degraded_when_snapshot_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_dir = dir.path().join("data");
    let repository = FileUrlRepository::open(snapshot_dir.join("links.json"))
        .await
        .unwrap();
    std::fs::remove_dir_all(&snapshot_dir).unwrap();

    let state = AppState::new(
        common::registry_over(Arc::new(repository)),
        common::TEST_BASE_URL,
    );
    let server = health_server(state);

    let response = server.get("/health").expect_failure().await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["storage"]["status"], "error");
}
