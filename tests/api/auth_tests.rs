//! Bearer authentication and request validation at the HTTP edge

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::common::{json_body, TestApp};

#[test_case("/api/posts" ; "feed")]
#[test_case("/api/user/profile" ; "own profile")]
#[test_case("/api/notifications" ; "notifications")]
#[test_case("/api/chat/stickers" ; "stickers")]
#[tokio::test]
async fn test_protected_route_requires_token(uri: &str) {
    let app = TestApp::new().await;
    let response = app.get(uri).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Missing authorization header");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = TestApp::new().await;
    let response = app.get_auth("/api/posts", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    use tower::ServiceExt;

    let app = TestApp::new().await;
    let request = axum::http::Request::builder()
        .uri("/api/posts")
        .header("Authorization", "Basic YW5uOnNlY3JldA==")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid authorization header format");
}

#[tokio::test]
async fn test_stickers_with_valid_token() {
    let app = TestApp::new().await;
    let token = app.token_for(1);

    let response = app.get_auth("/api/chat/stickers", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let stickers: Vec<String> = serde_json::from_value(body["stickers"].clone()).unwrap();
    assert_eq!(stickers, app.settings.chat.stickers);
}

#[tokio::test]
async fn test_self_follow_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.token_for(7);

    let response = app
        .post_json_auth("/api/users/7/follow", json!({}), &token)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conversation_with_self_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.token_for(7);

    let response = app
        .post_json_auth("/api/chat/conversations", json!({ "userId": 7 }), &token)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test_case(json!({ "email": "not-an-email", "name": "ann", "password": "password123" }) ; "invalid email")]
#[test_case(json!({ "email": "ann@example.com", "name": "ann", "password": "short" }) ; "short password")]
#[test_case(json!({ "email": "ann@example.com", "name": "a", "password": "password123" }) ; "short name")]
#[tokio::test]
async fn test_register_validation(body: serde_json::Value) {
    let app = TestApp::new().await;
    let response = app.post_json("/api/user/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["errors"].is_array());
}
