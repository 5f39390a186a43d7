// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin API input validation tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, bearer: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::AUTHORIZATION, bearer)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_unknown_platform_is_bad_request() {
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    for uri in [
        "/api/integrations/myspace",
        "/api/analytics/myspace",
        "/api/sync/myspace",
    ] {
        let method = if uri.starts_with("/api/sync") {
            "POST"
        } else {
            "GET"
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::AUTHORIZATION, &bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_client_id_too_long_rejected() {
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    let long_id = "a".repeat(257);
    let response = app
        .oneshot(put_json(
            "/api/integrations/youtube",
            &bearer,
            format!(r#"{{"client_id": "{}"}}"#, long_id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_manual_only_platform_cannot_take_credentials() {
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/integrations/whatsapp",
            &bearer,
            r#"{"client_id": "some-id"}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(put_json(
            "/api/integrations/viber",
            &bearer,
            r#"{"manual_mode": false}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_integration_round_trip() {
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/integrations/youtube",
            &bearer,
            r#"{"client_id": "yt-client", "client_secret": "yt-secret", "auto_sync": true, "sync_interval": "6h"}"#
                .to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let view = body_json(response).await;
    assert_eq!(view["client_id"], "yt-client");
    assert_eq!(view["has_credentials"], true);
    assert_eq!(view["auto_sync"], true);
    assert_eq!(view["sync_interval"], "6h");
    // The secret itself is never echoed back
    assert!(view.get("client_secret").is_none());
    assert!(view.get("client_secret_encrypted").is_none());

    // Stored encrypted, not plaintext
    let integration = state
        .store
        .get_integration(pulseboard::models::Platform::Youtube)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(integration.client_secret_encrypted, "yt-secret");
    assert_eq!(
        state
            .cipher
            .decrypt(&integration.client_secret_encrypted)
            .unwrap(),
        "yt-secret"
    );
}

#[tokio::test]
async fn test_manual_analytics_entry_computes_engagement() {
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/analytics/whatsapp",
            &bearer,
            r#"{"followers": 300, "impressions": 1000, "likes": 50, "shares": 30, "comments": 20, "posts": 9}"#
                .to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(response).await;
    assert_eq!(snapshot["engagement_rate"], "10.00");
    assert_eq!(snapshot["followers"], "300");

    // Zero impressions: engagement rate is defined as 0
    let response = app
        .oneshot(put_json(
            "/api/analytics/viber",
            &bearer,
            r#"{"followers": 10, "impressions": 0, "likes": 10, "shares": 5, "comments": 5, "posts": 1}"#
                .to_string(),
        ))
        .await
        .unwrap();
    let snapshot = body_json(response).await;
    assert_eq!(snapshot["engagement_rate"], "0.00");
}

#[tokio::test]
async fn test_sync_logs_limit_is_respected() {
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    for i in 0..10 {
        state
            .store
            .append_sync_log(&pulseboard::models::SyncLog {
                platform: pulseboard::models::Platform::Youtube,
                sync_type: pulseboard::models::SyncType::Scheduled,
                status: pulseboard::models::SyncStatus::Success,
                metrics_updated: vec![],
                error: None,
                timestamp: format!("2026-01-01T00:00:{:02}Z", i),
            })
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sync-logs?limit=4")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logs = body_json(response).await;
    assert_eq!(logs.as_array().unwrap().len(), 4);
    // Newest first
    assert_eq!(logs[0]["timestamp"], "2026-01-01T00:00:09Z");
}

#[tokio::test]
async fn test_integrations_list_covers_all_platforms() {
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/integrations")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let views = body_json(response).await;
    let views = views.as_array().unwrap();
    assert_eq!(views.len(), 7);

    // Manual-only platforms default to manual mode
    let whatsapp = views
        .iter()
        .find(|v| v["platform"] == "whatsapp")
        .unwrap();
    assert_eq!(whatsapp["manual_mode"], true);
    assert_eq!(whatsapp["is_connected"], false);
}
