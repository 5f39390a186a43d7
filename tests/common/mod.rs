// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pulseboard::config::Config;
use pulseboard::middleware::auth::create_jwt;
use pulseboard::models::{Platform, PlatformIntegration};
use pulseboard::services::{SyncService, TokenCipher};
use pulseboard::store::{MemoryStore, Store};
use pulseboard::time_utils::format_utc_rfc3339;
use pulseboard::AppState;
use serde_json::json;
use std::sync::Arc;

/// Access token the fake platform API rejects with a 500.
#[allow(dead_code)]
pub const BROKEN_ACCESS_TOKEN: &str = "broken-access-token";

/// Create a test app over an in-memory store with no endpoint override.
/// Fine for tests that never reach a platform API.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    build_app(None)
}

/// Create a test app with every platform's token and API endpoints
/// pointed at the given mock server base URL.
#[allow(dead_code)]
pub fn create_test_app_with_api(api_base: &str) -> (axum::Router, Arc<AppState>) {
    build_app(Some((format!("{}/oauth/token", api_base), api_base.to_string())))
}

/// Create a test app with explicit token/API endpoint overrides
/// (e.g. a broken token endpoint for refresh-failure tests).
#[allow(dead_code)]
pub fn create_test_app_with_endpoints(
    token_url: &str,
    api_base: &str,
) -> (axum::Router, Arc<AppState>) {
    build_app(Some((token_url.to_string(), api_base.to_string())))
}

fn build_app(endpoints: Option<(String, String)>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let store: Store = Arc::new(MemoryStore::new());
    let cipher = TokenCipher::new_mock();

    let mut sync_service = SyncService::new(store.clone(), cipher.clone());
    if let Some((token_url, api_base)) = endpoints {
        sync_service = sync_service.with_endpoint_override(token_url, api_base);
    }
    let sync_service = Arc::new(sync_service);

    let state = Arc::new(AppState {
        config,
        store,
        cipher,
        sync_service,
    });

    (pulseboard::routes::create_router(state.clone()), state)
}

/// Bearer token for the admin API.
#[allow(dead_code)]
pub fn admin_bearer(state: &Arc<AppState>) -> String {
    let token = create_jwt(&state.config.jwt_signing_key).expect("JWT creation");
    format!("Bearer {}", token)
}

/// Seed a connected integration with encrypted credentials and tokens.
/// `token_secs_from_now` may be negative to seed an expired token.
#[allow(dead_code)]
pub async fn seed_connected(
    state: &Arc<AppState>,
    platform: Platform,
    access_token: &str,
    token_secs_from_now: i64,
) {
    let mut integration = PlatformIntegration::new(platform);
    integration.client_id = "test-client-id".to_string();
    integration.client_secret_encrypted = state.cipher.encrypt("test-client-secret").unwrap();
    integration.access_token_encrypted = state.cipher.encrypt(access_token).unwrap();
    integration.refresh_token_encrypted = state.cipher.encrypt("valid-refresh-token").unwrap();
    integration.token_expires_at = format_utc_rfc3339(
        chrono::Utc::now() + chrono::Duration::seconds(token_secs_from_now),
    );
    integration.is_connected = true;

    state.store.put_integration(&integration).await.unwrap();
}

// ─── Fake platform API ───────────────────────────────────────
//
// One throwaway axum server stands in for every platform's REST API and
// OAuth token endpoint. Canned numbers are chosen so the Twitter sync
// produces an engagement rate of exactly 10.00:
// (likes 50 + shares 30 + comments 20) / impressions 1000 * 100.

/// Spawn the fake platform API server; returns its base URL.
#[allow(dead_code)]
pub async fn spawn_fake_platform_api() -> String {
    let app = Router::new()
        .route("/oauth/token", post(token_ok))
        .route("/oauth/broken-token", post(token_broken))
        // YouTube
        .route("/channels", get(yt_channels))
        .route("/search", get(yt_search))
        .route("/videos", get(yt_videos))
        // Twitter
        .route("/users/me", get(tw_me))
        .route("/users/{id}/tweets", get(tw_tweets))
        // Graph (Facebook/Instagram)
        .route("/me/accounts", get(graph_accounts))
        .route("/{id}", get(graph_object))
        .route("/{id}/insights", get(graph_insights))
        .route("/{id}/posts", get(graph_posts))
        .route("/{id}/media", get(graph_media))
        // LinkedIn
        .route("/organizationAcls", get(li_acls))
        .route("/organizations/{id}", get(li_org))
        .route("/networkSizes/{urn}", get(li_network))
        .route("/organizationalEntityShareStatistics", get(li_stats))
        .route("/shares", get(li_shares))
        .layer(axum::middleware::from_fn(reject_broken_token));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake API");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake API serve");
    });

    format!("http://{}", addr)
}

/// Simulate an upstream failure for one specific access token.
async fn reject_broken_token(request: Request, next: Next) -> Response {
    let broken = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h.contains(BROKEN_ACCESS_TOKEN));

    if broken {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "upstream exploded",
        )
            .into_response();
    }
    next.run(request).await
}

async fn token_ok() -> Json<serde_json::Value> {
    Json(json!({
        "access_token": "fresh-access-token",
        "refresh_token": "fresh-refresh-token",
        "expires_in": 3600
    }))
}

async fn token_broken() -> Response {
    (
        axum::http::StatusCode::BAD_REQUEST,
        Json(json!({"error": "invalid_grant"})),
    )
        .into_response()
}

async fn yt_channels() -> Json<serde_json::Value> {
    Json(json!({
        "items": [{
            "id": "chan-1",
            "snippet": {"title": "Acme Media"},
            "statistics": {
                "viewCount": "10000",
                "subscriberCount": "800",
                "videoCount": "45"
            }
        }]
    }))
}

async fn yt_search() -> Json<serde_json::Value> {
    Json(json!({
        "items": [
            {"id": {"videoId": "v1"}},
            {"id": {"videoId": "v2"}}
        ]
    }))
}

async fn yt_videos() -> Json<serde_json::Value> {
    Json(json!({
        "items": [
            {"statistics": {"likeCount": "60", "commentCount": "12"}},
            {"statistics": {"likeCount": "40", "commentCount": "8"}}
        ]
    }))
}

async fn tw_me() -> Json<serde_json::Value> {
    Json(json!({
        "data": {
            "id": "tw-1",
            "username": "acme",
            "public_metrics": {"followers_count": 500, "tweet_count": 120}
        }
    }))
}

async fn tw_tweets() -> Json<serde_json::Value> {
    Json(json!({
        "data": [
            {"public_metrics": {"like_count": 30, "retweet_count": 20, "reply_count": 15, "impression_count": 600}},
            {"public_metrics": {"like_count": 20, "retweet_count": 10, "reply_count": 5, "impression_count": 400}}
        ]
    }))
}

async fn graph_accounts() -> Json<serde_json::Value> {
    Json(json!({
        "data": [{
            "id": "page-1",
            "name": "Acme",
            "instagram_business_account": {"id": "ig-1"}
        }]
    }))
}

/// Union of the page and IG-profile fields; each fetcher picks what it
/// knows.
async fn graph_object() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Acme Page",
        "followers_count": 650,
        "fan_count": 600,
        "username": "acme_ig",
        "media_count": 42
    }))
}

async fn graph_insights() -> Json<serde_json::Value> {
    Json(json!({
        "data": [{"values": [{"value": 1500}, {"value": 2000}]}]
    }))
}

async fn graph_posts() -> Json<serde_json::Value> {
    Json(json!({
        "data": [
            {"likes": {"summary": {"total_count": 25}}, "comments": {"summary": {"total_count": 5}}, "shares": {"count": 7}},
            {"likes": {"summary": {"total_count": 15}}, "comments": {"summary": {"total_count": 3}}, "shares": {"count": 2}}
        ]
    }))
}

async fn graph_media() -> Json<serde_json::Value> {
    Json(json!({
        "data": [
            {"like_count": 30, "comments_count": 6},
            {"like_count": 10, "comments_count": 4}
        ]
    }))
}

async fn li_acls() -> Json<serde_json::Value> {
    Json(json!({"elements": [{"organization": "urn:li:organization:99"}]}))
}

async fn li_org() -> Json<serde_json::Value> {
    Json(json!({"localizedName": "Acme Inc"}))
}

async fn li_network() -> Json<serde_json::Value> {
    Json(json!({"firstDegreeSize": 720}))
}

async fn li_stats() -> Json<serde_json::Value> {
    Json(json!({
        "elements": [{
            "totalShareStatistics": {
                "impressionCount": 5000,
                "likeCount": 200,
                "shareCount": 80,
                "commentCount": 40
            }
        }]
    }))
}

async fn li_shares() -> Json<serde_json::Value> {
    Json(json!({"elements": [{}, {}, {}]}))
}
