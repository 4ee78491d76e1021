mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use link_registry::routes::app_router;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(state: &link_registry::AppState, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app_router(state.clone()).oneshot(request).await.unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, location, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_full_flow_through_router() {
    let state = common::create_test_state();

    let (status, _, body) = send(
        &state,
        post_json("/shorten", json!({ "url": "https://example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let code = body["short_code"].as_str().unwrap().to_string();

    let (status, location, _) = send(&state, get(&format!("/{}", code))).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("https://example.com"));

    let (status, _, body) = send(&state, get(&format!("/stats/{}", code))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clicks"], 1);

    let (status, _, body) = send(&state, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let state = common::create_test_state();

    let (status, _, _) = send(
        &state,
        post_json(
            "/shorten/",
            json!({ "url": "https://example.com", "custom_keyword": "slash" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, location, _) = send(&state, get("/slash/")).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn test_static_routes_win_over_codes() {
    let state = common::create_test_state();

    let (status, location, body) = send(&state, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.get("checks").is_some());
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let state = common::create_test_state();

    let (status, _, body) = send(&state, get("/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_route_prefix_keywords_redirect() {
    let state = common::create_test_state();

    for keyword in ["stats", "keyword"] {
        let (status, _, _) = send(
            &state,
            post_json(
                "/shorten",
                json!({ "url": "https://example.com/promo", "custom_keyword": keyword }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "keyword {:?}", keyword);

        let (status, location, _) = send(&state, get(&format!("/{}", keyword))).await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location.as_deref(), Some("https://example.com/promo"));
    }
}
