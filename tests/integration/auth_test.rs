//! Integration tests for authentication flow.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{STRONG_PASSWORD, TestApp, TestResponse};

#[tokio::test]
async fn test_register_sets_http_only_cookie() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "ana@example.com",
                "name": "Ana",
                "password": STRONG_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.session_cookie.is_some());
    let cookie = &response.set_cookies[0];
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));
    assert_eq!(response.data()["user"]["email"], "ana@example.com");
    assert!(response.data()["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("ana@example.com", "Ana").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "ANA@example.com",
                "name": "Other",
                "password": STRONG_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_weak_password_and_bad_email_rejected() {
    let app = TestApp::new();

    let weak = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "ana@example.com", "name": "Ana", "password": "password" })),
            None,
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);

    let bad_email = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "not-an-email", "name": "Ana", "password": STRONG_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success_and_me() {
    let app = TestApp::new();
    app.register("ana@example.com", "Ana").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@example.com", "password": STRONG_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let session = response.session_cookie.expect("session cookie");

    let me = app.request("GET", "/api/auth/me", None, Some(&session)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["name"], "Ana");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::new();
    app.register("ana@example.com", "Ana").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@example.com", "password": "wrong-password-123" })),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": STRONG_PASSWORD })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.error(), unknown_user.error());
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = TestApp::new();

    let anonymous = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forged = app
        .request("GET", "/api/auth/me", None, Some("not.a.jwt"))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let response = app
        .request_with_headers(
            "GET",
            "/api/auth/me",
            None,
            None,
            &[("authorization", &format!("Bearer {session}"))],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.session_cookie.is_none());
    let cookie = &response.set_cookies[0];
    assert!(cookie.starts_with("famli_session=;") || cookie.starts_with("famli_session=\"\""));
    assert!(cookie.contains("Max-Age=0"));
}

async fn register_via_forwarded_https(app: &TestApp) -> TestResponse {
    app.request_with_headers(
        "POST",
        "/api/auth/register",
        Some(json!({
            "email": "ana@example.com",
            "name": "Ana",
            "password": STRONG_PASSWORD,
        })),
        None,
        &[("x-forwarded-proto", "https")],
    )
    .await
}

#[tokio::test]
async fn test_forwarded_https_marks_cookie_secure_behind_trusted_proxy() {
    let app = TestApp::with_config(|config| config.server.trust_forwarded_proto = true);

    let response = register_via_forwarded_https(&app).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.set_cookies[0].contains("Secure"));
}

#[tokio::test]
async fn test_forwarded_proto_ignored_by_default() {
    let app = TestApp::new();
    assert!(!app.config.server.trust_forwarded_proto);

    let response = register_via_forwarded_https(&app).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(!response.set_cookies[0].contains("Secure"));
}

#[tokio::test]
async fn test_google_login_with_fake_verifier() {
    let app = TestApp::new();

    let ok = app
        .request(
            "POST",
            "/api/auth/google",
            Some(json!({ "credential": "google-bia" })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.data()["user"]["email"], "bia@gmail.com");
    assert!(ok.session_cookie.is_some());

    let rejected = app
        .request(
            "POST",
            "/api/auth/google",
            Some(json!({ "id_token": "forged" })),
            None,
        )
        .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unconfigured_apple_is_unavailable() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/apple",
            Some(json!({ "id_token": "a.b.c" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
}
