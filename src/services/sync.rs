// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync orchestration across platforms.
//!
//! `SyncService` owns the client factory inputs (store, cipher, HTTP
//! client) and a per-platform lock so a scheduled tick and a manual
//! "Sync Now" for the same platform serialize instead of racing the
//! credential and analytics records.

use crate::error::AppError;
use crate::models::{Platform, PlatformIntegration, SyncOutcome, SyncType};
use crate::services::crypto::TokenCipher;
use crate::services::sync_client::SyncClient;
use crate::store::Store;
use crate::time_utils::parse_utc_rfc3339;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-platform locks shared across triggers (scheduler + admin).
pub type SyncLocks = Arc<DashMap<Platform, Arc<Mutex<()>>>>;

#[derive(Clone)]
pub struct SyncService {
    store: Store,
    cipher: TokenCipher,
    http: reqwest::Client,
    sync_locks: SyncLocks,
    /// Test override: (token_url, api_base) pointed at a mock server
    endpoint_override: Option<(String, String)>,
}

impl SyncService {
    pub fn new(store: Store, cipher: TokenCipher) -> Self {
        Self {
            store,
            cipher,
            http: reqwest::Client::new(),
            sync_locks: Arc::new(DashMap::new()),
            endpoint_override: None,
        }
    }

    /// Point every platform's token and API endpoints at the given base
    /// URLs. Used by tests with a local mock server.
    pub fn with_endpoint_override(mut self, token_url: String, api_base: String) -> Self {
        self.endpoint_override = Some((token_url, api_base));
        self
    }

    /// Client factory: platform identifier to a ready sync client.
    /// Fails with `UnsupportedPlatform` for manual-entry-only platforms.
    pub fn client_for(&self, platform: Platform) -> Result<SyncClient, AppError> {
        let client = SyncClient::for_platform(
            platform,
            self.store.clone(),
            self.cipher.clone(),
            self.http.clone(),
        )?;
        Ok(match &self.endpoint_override {
            Some((token_url, api_base)) => {
                client.with_base_urls(token_url.clone(), api_base.clone())
            }
            None => client,
        })
    }

    /// Sync one platform, serialized against concurrent triggers for the
    /// same platform.
    pub async fn sync_platform(
        &self,
        platform: Platform,
        sync_type: SyncType,
    ) -> Result<SyncOutcome, AppError> {
        let client = self.client_for(platform)?;

        let lock = self
            .sync_locks
            .entry(platform)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        Ok(client.sync(sync_type).await)
    }

    /// Sync every syncable platform sequentially, collecting all
    /// outcomes. One platform's failure never prevents the others from
    /// being attempted. Manual-mode platforms are never targeted.
    pub async fn sync_all_platforms(&self, sync_type: SyncType) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::with_capacity(Platform::SYNCABLE.len());

        for platform in Platform::SYNCABLE {
            if self.is_manual_mode(platform).await {
                tracing::debug!(platform = %platform, "Skipping manual-mode platform");
                continue;
            }

            match self.sync_platform(platform, sync_type).await {
                Ok(outcome) => outcomes.push(outcome),
                // Factory errors (should not happen for SYNCABLE) still
                // yield a per-platform failure result
                Err(e) => outcomes.push(SyncOutcome::failed(platform, e.to_string())),
            }
        }

        outcomes
    }

    /// Platforms due for a scheduled sync right now.
    pub async fn due_platforms(&self) -> Vec<Platform> {
        let integrations = match self.store.list_integrations().await {
            Ok(integrations) => integrations,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list integrations for scheduling");
                return Vec::new();
            }
        };

        let now = Utc::now();
        integrations
            .iter()
            .filter(|i| is_due(i, now))
            .map(|i| i.platform)
            .collect()
    }

    /// Run scheduled syncs for every due platform.
    pub async fn sync_due_platforms(&self) -> Vec<SyncOutcome> {
        let due = self.due_platforms().await;
        let mut outcomes = Vec::with_capacity(due.len());

        for platform in due {
            match self.sync_platform(platform, SyncType::Scheduled).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!(platform = %platform, error = %e, "Scheduled sync rejected");
                }
            }
        }

        outcomes
    }

    async fn is_manual_mode(&self, platform: Platform) -> bool {
        matches!(
            self.store.get_integration(platform).await,
            Ok(Some(integration)) if integration.manual_mode
        )
    }
}

/// Whether an integration is eligible and due for a scheduled sync.
///
/// Manual-mode platforms are never due, whatever their flags say. A
/// connected auto-sync platform with no `next_sync_at` yet (never
/// synced) is due immediately.
pub fn is_due(integration: &PlatformIntegration, now: DateTime<Utc>) -> bool {
    if !integration.platform.supports_api_sync()
        || integration.manual_mode
        || !integration.is_connected
        || !integration.auto_sync
    {
        return false;
    }

    match parse_utc_rfc3339(&integration.next_sync_at) {
        Some(next) => next <= now,
        None => true,
    }
}
