//! Integration tests for analytics tracking and reports.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use famli_store::AnalyticsStore;

use helpers::{ADMIN_EMAIL, TestApp};

#[tokio::test]
async fn test_track_accepts_anonymous_and_signed_in() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    let anonymous = app
        .request(
            "POST",
            "/api/analytics/track",
            Some(json!({ "event_type": "page_view", "path": "/" })),
            None,
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::ACCEPTED);

    let signed_in = app
        .request(
            "POST",
            "/api/analytics/track",
            Some(json!({ "event_type": "page_view", "path": "/cofre", "metadata": { "ref": "menu" } })),
            Some(&session),
        )
        .await;
    assert_eq!(signed_in.status, StatusCode::ACCEPTED);

    let summary = app.store.get_analytics_summary().await.unwrap();
    assert_eq!(summary.events_by_type.get("page_view"), Some(&2));
}

#[tokio::test]
async fn test_reports_are_admin_only() {
    let app = TestApp::new();
    let session = app.register("ana@example.com", "Ana").await;

    for path in ["/api/analytics/summary", "/api/analytics/recent", "/api/analytics/daily"] {
        let response = app.request("GET", path, None, Some(&session)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");

        let anonymous = app.request("GET", path, None, None).await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn test_admin_reports() {
    let app = TestApp::new();
    let admin = app.register(ADMIN_EMAIL, "Admin").await;

    for _ in 0..3 {
        app.request(
            "POST",
            "/api/analytics/track",
            Some(json!({ "event_type": "page_view" })),
            None,
        )
        .await;
    }

    let summary = app
        .request("GET", "/api/analytics/summary", None, Some(&admin))
        .await;
    assert_eq!(summary.status, StatusCode::OK);
    assert!(summary.data()["total_events"].as_u64().unwrap() >= 3);
    assert_eq!(summary.data()["events_by_type"]["page_view"], 3);

    let recent = app
        .request("GET", "/api/analytics/recent?limit=2", None, Some(&admin))
        .await;
    assert_eq!(recent.status, StatusCode::OK);
    assert_eq!(recent.data().as_array().unwrap().len(), 2);

    let daily = app
        .request("GET", "/api/analytics/daily?days=7", None, Some(&admin))
        .await;
    assert_eq!(daily.status, StatusCode::OK);
    let days = daily.data().as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert!(days[6]["events"].as_u64().unwrap() >= 3);
}

#[tokio::test]
async fn test_track_validates_event_type() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/analytics/track",
            Some(json!({ "event_type": "" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
