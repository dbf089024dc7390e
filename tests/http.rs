mod common;

use axum::body::Body;
use common::{json_request, parse_body, request, TestServer};
use http::{Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new().await;
    let response = server
        .router()
        .oneshot(request(Method::GET, "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_version_reports_connected_screens() {
    let server = TestServer::new().await;
    let response = server
        .router()
        .oneshot(request(Method::GET, "/api/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["connected_screens"], 0);
}

#[tokio::test]
async fn test_not_found() {
    let server = TestServer::new().await;
    let response = server
        .router()
        .oneshot(request(Method::GET, "/nonexistent"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight() {
    let server = TestServer::new().await;
    let response = server
        .router()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/save-content")
                .header("Origin", "http://example.com")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
    assert!(response
        .headers()
        .contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_ws_rejects_non_upgrade() {
    let server = TestServer::new().await;
    let response = server
        .router()
        .oneshot(request(Method::GET, "/ws"))
        .await
        .unwrap();
    assert!(
        response.status().is_client_error(),
        "expected client error, got {}",
        response.status()
    );
}

// =========================================================================
// Screens
// =========================================================================

#[tokio::test]
async fn test_register_and_list_screens() {
    let server = TestServer::new().await;

    let response = server
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/screens",
            &json!({ "screenId": " lobby-1 " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["data"]["id"], "lobby-1");

    let response = server
        .router()
        .oneshot(request(Method::GET, "/api/screens"))
        .await
        .unwrap();
    let body = parse_body(response).await;
    let screens = body["data"].as_array().unwrap();
    assert_eq!(screens.len(), 1);
    assert_eq!(screens[0]["id"], "lobby-1");
    assert_eq!(screens[0]["connected"], false);
}

#[tokio::test]
async fn test_register_screen_requires_id() {
    let server = TestServer::new().await;
    for body in [json!({}), json!({ "screenId": "   " })] {
        let response = server
            .router()
            .oneshot(json_request(Method::POST, "/api/screens", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_register_duplicate_screen_conflicts() {
    let server = TestServer::new().await;
    server.register_screen("lobby-1").await;

    let response = server
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/screens",
            &json!({ "screenId": "lobby-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_body(response).await;
    assert_eq!(body["error"]["code"], "already_exists");
}

// =========================================================================
// Content
// =========================================================================

#[tokio::test]
async fn test_save_content_rejects_invalid_data() {
    let server = TestServer::new().await;
    server.register_screen("lobby-1").await;

    for body in [
        json!({ "screenId": "lobby-1" }),
        json!({ "screenId": "lobby-1", "data": "" }),
        json!({ "screenId": "lobby-1", "data": 42 }),
    ] {
        let response = server
            .router()
            .oneshot(json_request(Method::POST, "/api/save-content", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(response).await;
        assert_eq!(
            body["error"]["message"],
            "Invalid data. Expected a non-empty string."
        );
    }
}

#[tokio::test]
async fn test_save_content_for_unknown_screen_is_404() {
    let server = TestServer::new().await;
    let response = server
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/save-content",
            &json!({ "screenId": "ghost", "data": "slide" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_crud_lifecycle() {
    let server = TestServer::new().await;
    server.register_screen("lobby-1").await;
    server.register_screen("lobby-2").await;

    let response = server
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/save-content",
            &json!({ "screenId": "lobby-1", "data": "slide-A" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["message"], "Content saved successfully.");
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["screenId"], "lobby-1");

    server.create_content("lobby-2", "other").await;

    let response = server
        .router()
        .oneshot(request(Method::GET, "/api/contents?screenId=lobby-1"))
        .await
        .unwrap();
    let body = parse_body(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["data"], "slide-A");

    let response = server
        .router()
        .oneshot(request(Method::GET, "/api/contents"))
        .await
        .unwrap();
    let body = parse_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = server
        .router()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/contents/{id}"),
            &json!({ "data": "slide-B" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["data"]["data"], "slide-B");

    let response = server
        .router()
        .oneshot(request(Method::DELETE, &format!("/api/contents/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .router()
        .oneshot(request(Method::DELETE, &format!("/api/contents/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_content_is_404() {
    let server = TestServer::new().await;
    let response = server
        .router()
        .oneshot(json_request(
            Method::PUT,
            "/api/contents/999",
            &json!({ "data": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
