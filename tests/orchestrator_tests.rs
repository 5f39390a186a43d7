// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Orchestrator behavior: bulk sync isolation, manual-mode skipping,
//! and the manual-entry-only platform rejection.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pulseboard::models::{Platform, SyncType};
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_sync_all_one_failure_does_not_short_circuit() {
    let api_base = common::spawn_fake_platform_api().await;
    let (_, state) = common::create_test_app_with_api(&api_base);

    // Four healthy platforms; Facebook's token makes the upstream 500
    for platform in Platform::SYNCABLE {
        let token = if platform == Platform::Facebook {
            common::BROKEN_ACCESS_TOKEN
        } else {
            "valid-access-token"
        };
        common::seed_connected(&state, platform, token, 3600).await;
    }

    let outcomes = state.sync_service.sync_all_platforms(SyncType::Manual).await;

    assert_eq!(outcomes.len(), Platform::SYNCABLE.len());
    let failures: Vec<_> = outcomes.iter().filter(|o| !o.success).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].platform, Platform::Facebook);
    assert!(failures[0].error.as_deref().unwrap().contains("facebook"));

    // The healthy platforms all wrote their snapshots
    for platform in Platform::SYNCABLE {
        let snapshot = state.store.get_analytics(platform).await.unwrap();
        if platform == Platform::Facebook {
            assert!(snapshot.is_none());
        } else {
            assert!(snapshot.is_some(), "{} snapshot missing", platform);
        }
    }
}

#[tokio::test]
async fn test_sync_all_skips_manual_mode_platforms() {
    let api_base = common::spawn_fake_platform_api().await;
    let (_, state) = common::create_test_app_with_api(&api_base);

    for platform in Platform::SYNCABLE {
        common::seed_connected(&state, platform, "valid-access-token", 3600).await;
    }
    let mut instagram = state
        .store
        .get_integration(Platform::Instagram)
        .await
        .unwrap()
        .unwrap();
    instagram.manual_mode = true;
    state.store.put_integration(&instagram).await.unwrap();

    let outcomes = state.sync_service.sync_all_platforms(SyncType::Manual).await;

    assert_eq!(outcomes.len(), Platform::SYNCABLE.len() - 1);
    assert!(outcomes.iter().all(|o| o.platform != Platform::Instagram));

    // Nothing was logged for the skipped platform
    let logs = state.store.recent_sync_logs(50).await.unwrap();
    assert!(logs.iter().all(|l| l.platform != Platform::Instagram));
}

#[tokio::test]
async fn test_whatsapp_and_viber_rejected_before_any_network_call() {
    // No fake API at all: the rejection must happen in the factory
    let (app, state) = common::create_test_app();
    let bearer = common::admin_bearer(&state);

    for platform in [Platform::Whatsapp, Platform::Viber] {
        let error = state
            .sync_service
            .client_for(platform)
            .err()
            .expect("factory must reject");
        assert!(matches!(
            error,
            pulseboard::error::AppError::UnsupportedPlatform(_)
        ));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/sync/{}", platform))
                    .header(header::AUTHORIZATION, &bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "unsupported_platform");
        assert!(body["details"].as_str().unwrap().contains("manual entry"));
    }

    // And nothing reached the sync log
    assert!(state.store.recent_sync_logs(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_sync_endpoint_returns_all_outcomes() {
    let api_base = common::spawn_fake_platform_api().await;
    let (app, state) = common::create_test_app_with_api(&api_base);
    let bearer = common::admin_bearer(&state);

    for platform in Platform::SYNCABLE {
        common::seed_connected(&state, platform, "valid-access-token", 3600).await;
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/sync")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outcomes = body_json(response).await;
    let outcomes = outcomes.as_array().unwrap();
    assert_eq!(outcomes.len(), Platform::SYNCABLE.len());
    assert!(outcomes.iter().all(|o| o["success"] == true));
}

#[tokio::test]
async fn test_scheduler_runs_due_platforms_only() {
    let api_base = common::spawn_fake_platform_api().await;
    let (_, state) = common::create_test_app_with_api(&api_base);

    // Twitter due (auto-sync, never synced); LinkedIn connected but
    // auto-sync off; Facebook due but in manual mode
    common::seed_connected(&state, Platform::Twitter, "valid-access-token", 3600).await;
    common::seed_connected(&state, Platform::Linkedin, "valid-access-token", 3600).await;
    common::seed_connected(&state, Platform::Facebook, "valid-access-token", 3600).await;

    for (platform, auto_sync, manual_mode) in [
        (Platform::Twitter, true, false),
        (Platform::Linkedin, false, false),
        (Platform::Facebook, true, true),
    ] {
        let mut integration = state.store.get_integration(platform).await.unwrap().unwrap();
        integration.auto_sync = auto_sync;
        integration.manual_mode = manual_mode;
        state.store.put_integration(&integration).await.unwrap();
    }

    let outcomes = state.sync_service.sync_due_platforms().await;
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].platform, Platform::Twitter);
    assert!(outcomes[0].success);

    // A successful sync schedules the next one; nothing is due right after
    assert!(state.sync_service.due_platforms().await.is_empty());
}
