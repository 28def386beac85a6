//! Integration tests for box items, guardians and settings.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use famli_store::ItemStore;

use helpers::TestApp;

#[tokio::test]
async fn test_sensitive_item_is_encrypted_at_rest() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let created = app
        .request(
            "POST",
            "/api/items",
            Some(json!({
                "title": "Cofre",
                "content": "combinação 12-34-56",
                "category": "Segredos",
                "is_sensitive": true,
            })),
            Some(&session),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["content"], "combinação 12-34-56");
    assert_eq!(created.data()["category"], "segredos");

    let id: Uuid = created.data()["id"].as_str().unwrap().parse().unwrap();
    let user_id: Uuid = created.data()["user_id"].as_str().unwrap().parse().unwrap();
    let stored = app.store.get_box_item(user_id, id).await.unwrap().unwrap();
    assert_ne!(stored.content, "combinação 12-34-56");

    let fetched = app
        .request("GET", &format!("/api/items/{id}"), None, Some(&session))
        .await;
    assert_eq!(fetched.data()["content"], "combinação 12-34-56");
}

#[tokio::test]
async fn test_item_update_and_delete() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;
    let created = app
        .request(
            "POST",
            "/api/items",
            Some(json!({ "title": "Nota", "content": "v1", "category": "geral" })),
            Some(&session),
        )
        .await;
    let id = created.data()["id"].as_str().unwrap().to_string();

    let updated = app
        .request(
            "PUT",
            &format!("/api/items/{id}"),
            Some(json!({ "content": "v2" })),
            Some(&session),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["content"], "v2");
    assert_eq!(updated.data()["title"], "Nota");

    let deleted = app
        .request("DELETE", &format!("/api/items/{id}"), None, Some(&session))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let missing = app
        .request("GET", &format!("/api/items/{id}"), None, Some(&session))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_items_are_owner_scoped() {
    let app = TestApp::new();
    let ana = app.register("ana@example.com", "Ana").await;
    let bia = app.register("bia@example.com", "Bia").await;
    let created = app
        .request(
            "POST",
            "/api/items",
            Some(json!({ "title": "Da Ana", "content": "x", "category": "geral" })),
            Some(&ana),
        )
        .await;
    let id = created.data()["id"].as_str().unwrap().to_string();

    let response = app
        .request("GET", &format!("/api/items/{id}"), None, Some(&bia))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let listed = app.request("GET", "/api/items", None, Some(&bia)).await;
    assert_eq!(listed.data().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_item_validation() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let response = app
        .request(
            "POST",
            "/api/items",
            Some(json!({ "title": "", "content": "x", "category": "geral" })),
            Some(&session),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let malformed = app
        .request("POST", "/api/items", Some(json!({ "title": 3 })), Some(&session))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert!(!malformed.error().is_empty());
}

#[tokio::test]
async fn test_guardian_lifecycle() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let created = app
        .request(
            "POST",
            "/api/guardians",
            Some(json!({ "name": "Bia", "email": "bia@example.com", "phone": "+55 11 99999-0000" })),
            Some(&session),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.data()["id"].as_str().unwrap().to_string();

    let listed = app.request("GET", "/api/guardians", None, Some(&session)).await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    let deleted = app
        .request("DELETE", &format!("/api/guardians/{id}"), None, Some(&session))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let again = app
        .request("DELETE", &format!("/api/guardians/{id}"), None, Some(&session))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_defaults_and_update() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let defaults = app.request("GET", "/api/settings", None, Some(&session)).await;
    assert_eq!(defaults.status, StatusCode::OK);
    assert_eq!(defaults.data()["language"], "pt-BR");

    let updated = app
        .request(
            "PUT",
            "/api/settings",
            Some(json!({ "language": "en", "emergency_message": "Liguem para a Bia" })),
            Some(&session),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["language"], "en");
    assert_eq!(updated.data()["emergency_message"], "Liguem para a Bia");

    let cleared = app
        .request(
            "PUT",
            "/api/settings",
            Some(json!({ "emergency_message": null })),
            Some(&session),
        )
        .await;
    assert!(cleared.data()["emergency_message"].is_null());
    assert_eq!(cleared.data()["language"], "en");

    let unsupported = app
        .request(
            "PUT",
            "/api/settings",
            Some(json!({ "language": "klingon" })),
            Some(&session),
        )
        .await;
    assert_eq!(unsupported.status, StatusCode::BAD_REQUEST);
}
