// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin API routes (require authentication via JWT).
//! The auth middleware is applied in routes/mod.rs for these routes.

use crate::error::{AppError, Result};
use crate::models::{
    Platform, PlatformAnalytics, PlatformIntegration, PlatformMetrics, SyncInterval, SyncLog,
    SyncOutcome, SyncType,
};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

const DEFAULT_LOG_LIMIT: usize = 50;
const MAX_LOG_LIMIT: usize = 200;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/integrations", get(list_integrations))
        .route(
            "/api/integrations/{platform}",
            get(get_integration).put(update_integration),
        )
        .route(
            "/api/integrations/{platform}/disconnect",
            post(disconnect_integration),
        )
        .route("/api/analytics", get(list_analytics))
        .route(
            "/api/analytics/{platform}",
            get(get_analytics).put(update_analytics),
        )
        .route("/api/sync", post(sync_all))
        .route("/api/sync/{platform}", post(sync_one))
        .route("/api/sync-logs", get(sync_logs))
}

fn parse_platform(raw: &str) -> Result<Platform> {
    raw.parse()
}

// ─── Integrations ────────────────────────────────────────────

/// Integration config as exposed to the admin UI. Secrets and tokens are
/// never echoed back; only their presence is reported.
#[derive(Serialize)]
pub struct IntegrationView {
    pub platform: Platform,
    pub client_id: String,
    pub has_credentials: bool,
    pub account_id: String,
    pub account_name: String,
    pub is_connected: bool,
    pub auto_sync: bool,
    pub sync_interval: SyncInterval,
    pub manual_mode: bool,
    pub last_sync_at: String,
    pub next_sync_at: String,
    pub published: bool,
}

impl From<&PlatformIntegration> for IntegrationView {
    fn from(i: &PlatformIntegration) -> Self {
        Self {
            platform: i.platform,
            client_id: i.client_id.clone(),
            has_credentials: !i.client_secret_encrypted.is_empty(),
            account_id: i.account_id.clone(),
            account_name: i.account_name.clone(),
            is_connected: i.is_connected,
            auto_sync: i.auto_sync,
            sync_interval: i.sync_interval,
            manual_mode: i.manual_mode,
            last_sync_at: i.last_sync_at.clone(),
            next_sync_at: i.next_sync_at.clone(),
            published: i.published,
        }
    }
}

/// One row per recognized platform, stored or default.
async fn list_integrations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<IntegrationView>>> {
    let mut views = Vec::with_capacity(Platform::ALL.len());
    for platform in Platform::ALL {
        let integration = state
            .store
            .get_integration(platform)
            .await?
            .unwrap_or_else(|| PlatformIntegration::new(platform));
        views.push(IntegrationView::from(&integration));
    }
    Ok(Json(views))
}

async fn get_integration(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
) -> Result<Json<IntegrationView>> {
    let platform = parse_platform(&platform)?;
    let integration = state
        .store
        .get_integration(platform)
        .await?
        .unwrap_or_else(|| PlatformIntegration::new(platform));
    Ok(Json(IntegrationView::from(&integration)))
}

#[derive(Deserialize, Validate)]
pub struct UpdateIntegrationRequest {
    #[validate(length(max = 256))]
    pub client_id: Option<String>,
    #[validate(length(max = 512))]
    pub client_secret: Option<String>,
    pub auto_sync: Option<bool>,
    pub sync_interval: Option<SyncInterval>,
    pub manual_mode: Option<bool>,
    pub published: Option<bool>,
}

/// Create or update a platform's integration config. The client secret
/// is encrypted before it touches the store.
async fn update_integration(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    Json(body): Json<UpdateIntegrationRequest>,
) -> Result<Json<IntegrationView>> {
    let platform = parse_platform(&platform)?;
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if !platform.supports_api_sync() {
        // Manual-only platforms have no OAuth app to configure and can
        // never leave manual mode
        if body.client_id.is_some() || body.client_secret.is_some() {
            return Err(AppError::BadRequest(format!(
                "{} has no analytics API; credentials cannot be configured",
                platform
            )));
        }
        if body.manual_mode == Some(false) {
            return Err(AppError::BadRequest(format!(
                "{} supports manual entry only",
                platform
            )));
        }
    }

    let mut integration = state
        .store
        .get_integration(platform)
        .await?
        .unwrap_or_else(|| PlatformIntegration::new(platform));

    if let Some(client_id) = body.client_id {
        integration.client_id = client_id;
    }
    if let Some(client_secret) = body.client_secret {
        integration.client_secret_encrypted = state.cipher.encrypt(&client_secret)?;
    }
    if let Some(auto_sync) = body.auto_sync {
        integration.auto_sync = auto_sync;
    }
    if let Some(sync_interval) = body.sync_interval {
        integration.sync_interval = sync_interval;
    }
    if let Some(manual_mode) = body.manual_mode {
        integration.manual_mode = manual_mode;
    }
    if let Some(published) = body.published {
        integration.published = published;
    }

    state.store.put_integration(&integration).await?;
    tracing::info!(platform = %platform, "Integration config updated");

    Ok(Json(IntegrationView::from(&integration)))
}

#[derive(Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
    pub message: String,
}

/// Clear stored tokens and mark the platform disconnected. The record
/// itself (and its sync history) survives for reconnection.
async fn disconnect_integration(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
) -> Result<Json<DisconnectResponse>> {
    let platform = parse_platform(&platform)?;

    let mut integration = state
        .store
        .get_integration(platform)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Integration for {}", platform)))?;

    integration.disconnect();
    state.store.put_integration(&integration).await?;

    tracing::info!(platform = %platform, "Platform disconnected");
    Ok(Json(DisconnectResponse {
        success: true,
        message: format!("{} disconnected; stored tokens cleared", platform),
    }))
}

// ─── Analytics ───────────────────────────────────────────────

/// One snapshot per recognized platform, stored or empty.
async fn list_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlatformAnalytics>>> {
    let mut snapshots = Vec::with_capacity(Platform::ALL.len());
    for platform in Platform::ALL {
        let snapshot = state
            .store
            .get_analytics(platform)
            .await?
            .unwrap_or_else(|| PlatformAnalytics::empty(platform));
        snapshots.push(snapshot);
    }
    Ok(Json(snapshots))
}

async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
) -> Result<Json<PlatformAnalytics>> {
    let platform = parse_platform(&platform)?;
    let snapshot = state
        .store
        .get_analytics(platform)
        .await?
        .unwrap_or_else(|| PlatformAnalytics::empty(platform));
    Ok(Json(snapshot))
}

#[derive(Deserialize)]
pub struct ManualMetricsRequest {
    pub followers: u64,
    pub impressions: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub posts: u64,
}

/// Manual metrics entry: overwrite the snapshot wholesale, deriving the
/// engagement rate the same way a sync would.
async fn update_analytics(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    Json(body): Json<ManualMetricsRequest>,
) -> Result<Json<PlatformAnalytics>> {
    let platform = parse_platform(&platform)?;

    let metrics = PlatformMetrics::from_counts(
        body.followers,
        body.impressions,
        body.likes,
        body.shares,
        body.comments,
        body.posts,
    );
    let snapshot = PlatformAnalytics::from_metrics(
        platform,
        &metrics,
        &format_utc_rfc3339(chrono::Utc::now()),
    );

    state.store.put_analytics(&snapshot).await?;
    tracing::info!(platform = %platform, "Analytics updated manually");

    Ok(Json(snapshot))
}

// ─── Sync ────────────────────────────────────────────────────

/// Trigger a sync for one platform. Manual-entry-only platforms are
/// rejected before any network call.
async fn sync_one(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
) -> Result<Json<SyncOutcome>> {
    let platform = parse_platform(&platform)?;
    let outcome = state
        .sync_service
        .sync_platform(platform, SyncType::Manual)
        .await?;
    Ok(Json(outcome))
}

/// Trigger a sync across all syncable platforms; returns every
/// per-platform outcome, success and failure alike.
async fn sync_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<SyncOutcome>>> {
    let outcomes = state.sync_service.sync_all_platforms(SyncType::Manual).await;
    Ok(Json(outcomes))
}

// ─── Sync History ────────────────────────────────────────────

#[derive(Deserialize)]
struct SyncLogsQuery {
    limit: Option<usize>,
}

/// Recent sync attempts, newest first.
async fn sync_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SyncLogsQuery>,
) -> Result<Json<Vec<SyncLog>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LOG_LIMIT)
        .min(MAX_LOG_LIMIT);
    let logs = state.store.recent_sync_logs(limit).await?;
    Ok(Json(logs))
}
