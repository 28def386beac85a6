//! Integration tests for share links, owner side and public side.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::TestApp;

async fn add_item(app: &TestApp, session: &str, title: &str, category: &str, sensitive: bool) {
    let response = app
        .request(
            "POST",
            "/api/items",
            Some(json!({
                "title": title,
                "content": format!("{title} content"),
                "category": category,
                "is_sensitive": sensitive,
            })),
            Some(session),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
}

async fn create_link(app: &TestApp, session: &str, body: Value) -> Value {
    let response = app
        .request("POST", "/api/share-links", Some(body), Some(session))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.data().clone()
}

fn token_of(link: &Value) -> String {
    link["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn test_created_link_has_token_and_url() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let link = create_link(&app, &session, json!({ "name": "Família", "link_type": "normal" })).await;

    let token = token_of(&link);
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(link["url"], format!("https://famli.test/compartilhado/{token}"));
    assert_eq!(link["has_pin"], false);
    assert!(link.get("pin_hash").is_none());
}

#[tokio::test]
async fn test_normal_link_filters_categories_and_decrypts() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;
    add_item(&app, &session, "Senha do banco", "financeiro", true).await;
    add_item(&app, &session, "Receita da vó", "receitas", false).await;

    let link = create_link(
        &app,
        &session,
        json!({ "name": "Banco", "link_type": "normal", "categories": ["Financeiro"] }),
    )
    .await;

    let response = app
        .request("GET", &format!("/api/shared/{}", token_of(&link)), None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Senha do banco");
    assert_eq!(items[0]["content"], "Senha do banco content");
    assert!(response.data().get("guardians").is_none());
    assert!(response.data().get("owner_email").is_none());
}

#[tokio::test]
async fn test_memorial_link_exposes_guardians_and_email() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;
    let guardian = app
        .request(
            "POST",
            "/api/guardians",
            Some(json!({ "name": "Bia", "email": "bia@example.com", "relationship": "filha" })),
            Some(&session),
        )
        .await;
    assert_eq!(guardian.status, StatusCode::CREATED);

    let link = create_link(&app, &session, json!({ "name": "Memória", "link_type": "memorial" })).await;

    let response = app
        .request("GET", &format!("/api/shared/{}", token_of(&link)), None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let view = response.data();
    assert_eq!(view["owner_email"], "ana@example.com");
    assert_eq!(view["guardians"][0]["name"], "Bia");
    assert!(view["message"].is_string());
}

#[tokio::test]
async fn test_max_uses_exhausts_link() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;
    let link = create_link(
        &app,
        &session,
        json!({ "name": "Duas vezes", "link_type": "normal", "max_uses": 2 }),
    )
    .await;
    let path = format!("/api/shared/{}", token_of(&link));

    assert_eq!(app.request("GET", &path, None, None).await.status, StatusCode::OK);
    assert_eq!(app.request("GET", &path, None, None).await.status, StatusCode::OK);
    assert_eq!(
        app.request("GET", &path, None, None).await.status,
        StatusCode::NOT_FOUND
    );

    let links = app.request("GET", "/api/share-links", None, Some(&session)).await;
    assert_eq!(links.data()[0]["usage_count"], 2);
    assert_eq!(links.data()[0]["is_usable"], false);
}

#[tokio::test]
async fn test_pin_gate() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;
    let link = create_link(
        &app,
        &session,
        json!({ "name": "Com PIN", "link_type": "emergency", "pin": "4321" }),
    )
    .await;
    let id = link["id"].as_str().unwrap().to_string();
    let token = token_of(&link);

    let challenge = app
        .request("GET", &format!("/api/shared/{token}"), None, None)
        .await;
    assert_eq!(challenge.status, StatusCode::OK);
    assert_eq!(challenge.data()["requires_pin"], true);
    assert_eq!(challenge.data()["link_type"], "emergency");

    let wrong = app
        .request(
            "POST",
            &format!("/api/shared/{token}/verify"),
            Some(json!({ "pin": "0000" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let accesses = app
        .request("GET", &format!("/api/share-links/{id}/accesses"), None, Some(&session))
        .await;
    assert_eq!(accesses.data().as_array().unwrap().len(), 0);

    let right = app
        .request_with_headers(
            "POST",
            &format!("/api/shared/{token}/verify"),
            Some(json!({ "pin": "4321" })),
            None,
            &[("x-forwarded-for", "203.0.113.9, 10.0.0.1"), ("user-agent", "famli-test")],
        )
        .await;
    assert_eq!(right.status, StatusCode::OK);
    assert_eq!(right.data()["link_name"], "Com PIN");

    let accesses = app
        .request("GET", &format!("/api/share-links/{id}/accesses"), None, Some(&session))
        .await;
    let records = accesses.data().as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["ip_address"], "203.0.113.9");
    assert_eq!(records[0]["user_agent"], "famli-test");
}

#[tokio::test]
async fn test_unknown_and_malformed_tokens_are_not_found() {
    let app = TestApp::new();

    let unknown = app
        .request("GET", &format!("/api/shared/{}", "a".repeat(32)), None, None)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error(), "Share link not found");

    let malformed = app.request("GET", "/api/shared/..%2Fetc", None, None).await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_link_stops_resolving() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;
    let link = create_link(&app, &session, json!({ "name": "Tchau", "link_type": "normal" })).await;
    let id = link["id"].as_str().unwrap();

    let deleted = app
        .request("DELETE", &format!("/api/share-links/{id}"), None, Some(&session))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/shared/{}", token_of(&link)), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_links_are_owner_scoped() {
    let app = TestApp::new();
    let ana = app.register("ana@example.com", "Ana").await;
    let bia = app.register("bia@example.com", "Bia").await;
    let link = create_link(&app, &ana, json!({ "name": "Só da Ana", "link_type": "normal" })).await;
    let id = link["id"].as_str().unwrap();

    let listed = app.request("GET", "/api/share-links", None, Some(&bia)).await;
    assert_eq!(listed.data().as_array().unwrap().len(), 0);

    let delete = app
        .request("DELETE", &format!("/api/share-links/{id}"), None, Some(&bia))
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_link_requests_rejected() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let bad_pin = app
        .request(
            "POST",
            "/api/share-links",
            Some(json!({ "name": "x", "link_type": "normal", "pin": "12ab" })),
            Some(&session),
        )
        .await;
    assert_eq!(bad_pin.status, StatusCode::BAD_REQUEST);

    let bad_type = app
        .request(
            "POST",
            "/api/share-links",
            Some(json!({ "name": "x", "link_type": "secret" })),
            Some(&session),
        )
        .await;
    assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);

    let anonymous = app
        .request(
            "POST",
            "/api/share-links",
            Some(json!({ "name": "x", "link_type": "normal" })),
            None,
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}
