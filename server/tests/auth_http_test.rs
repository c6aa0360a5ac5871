//! HTTP tests for viewer resolution and route guards.
//!
//! Every request here is rejected before any query runs, so no database or
//! Redis is needed.
//!
//! Run with: `cargo test --test auth_http_test`

mod helpers;

use axum::body::Body;
use axum::http::{Method, StatusCode};
use chrono::Duration;
use helpers::{body_to_json, sign_token, TestApp};
use uuid::Uuid;
use vs_server::auth::jwt::TokenType;

#[tokio::test]
async fn test_health_reports_optional_backends() {
    let app = TestApp::offline();

    let resp = app.send(Method::GET, "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_to_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["download_quota"], false);
    assert_eq!(json["object_storage"], false);
}

#[tokio::test]
async fn test_guest_cannot_read_download_quota() {
    let app = TestApp::offline();

    let resp = app.send(Method::GET, "/api/me/download-quota", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_json(resp).await["error"], "LOGIN_REQUIRED");
}

#[tokio::test]
async fn test_guest_cannot_reach_admin_routes() {
    let app = TestApp::offline();
    let uri = format!("/api/admin/users/{}/download-quota", Uuid::now_v7());

    let resp = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_to_json(resp).await["error"], "not_admin");
}

#[tokio::test]
async fn test_malformed_header_is_not_downgraded_to_guest() {
    let app = TestApp::offline();

    let req = TestApp::request(Method::GET, "/api/episodes/pilot/access")
        .header("Authorization", "Token abc")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_json(resp).await["error"], "INVALID_AUTH_HEADER");
}

#[tokio::test]
async fn test_invalid_tokens_rejected() {
    let app = TestApp::offline();
    let user_id = Uuid::now_v7();

    let expired = sign_token(user_id, TokenType::Access, Duration::minutes(-5));
    let refresh = sign_token(user_id, TokenType::Refresh, Duration::days(7));
    let cases = [
        ("garbage", "INVALID_TOKEN"),
        (expired.as_str(), "TOKEN_EXPIRED"),
        (refresh.as_str(), "INVALID_TOKEN"),
    ];

    for (token, code) in cases {
        let resp = app
            .send(Method::GET, "/api/episodes/pilot/access", Some(token))
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_to_json(resp).await["error"], code);
    }
}

#[tokio::test]
async fn test_unknown_tier_rejected_before_lookup() {
    let app = TestApp::offline();

    let resp = app
        .send(Method::GET, "/api/episodes/pilot/playback/4k", None)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_to_json(resp).await;
    assert_eq!(json["error"], "invalid_tier");
    assert_eq!(json["message"], "Unknown quality tier: 4k");
}
