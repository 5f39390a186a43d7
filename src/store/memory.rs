// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store backend.
//!
//! Keeps one integration and one analytics record per platform (upsert
//! keyed by platform) and the sync log as an append-only vector. Used
//! directly in tests and local development.

use crate::error::AppError;
use crate::models::{Platform, PlatformAnalytics, PlatformIntegration, SyncLog};
use crate::store::SocialStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    integrations: RwLock<HashMap<Platform, PlatformIntegration>>,
    analytics: RwLock<HashMap<Platform, PlatformAnalytics>>,
    sync_logs: RwLock<Vec<SyncLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SocialStore for MemoryStore {
    async fn get_integration(
        &self,
        platform: Platform,
    ) -> Result<Option<PlatformIntegration>, AppError> {
        Ok(self.integrations.read().await.get(&platform).cloned())
    }

    async fn put_integration(&self, integration: &PlatformIntegration) -> Result<(), AppError> {
        self.integrations
            .write()
            .await
            .insert(integration.platform, integration.clone());
        Ok(())
    }

    async fn list_integrations(&self) -> Result<Vec<PlatformIntegration>, AppError> {
        Ok(self.integrations.read().await.values().cloned().collect())
    }

    async fn get_analytics(
        &self,
        platform: Platform,
    ) -> Result<Option<PlatformAnalytics>, AppError> {
        Ok(self.analytics.read().await.get(&platform).cloned())
    }

    async fn put_analytics(&self, analytics: &PlatformAnalytics) -> Result<(), AppError> {
        self.analytics
            .write()
            .await
            .insert(analytics.platform, analytics.clone());
        Ok(())
    }

    async fn list_analytics(&self) -> Result<Vec<PlatformAnalytics>, AppError> {
        Ok(self.analytics.read().await.values().cloned().collect())
    }

    async fn append_sync_log(&self, entry: &SyncLog) -> Result<(), AppError> {
        self.sync_logs.write().await.push(entry.clone());
        Ok(())
    }

    async fn recent_sync_logs(&self, limit: usize) -> Result<Vec<SyncLog>, AppError> {
        let logs = self.sync_logs.read().await;
        Ok(logs.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlatformMetrics, SyncStatus, SyncType};
    use crate::store::SocialStore;

    #[tokio::test]
    async fn test_integration_upsert_is_keyed_by_platform() {
        let store = MemoryStore::new();

        let mut first = PlatformIntegration::new(Platform::Youtube);
        first.client_id = "one".to_string();
        store.put_integration(&first).await.unwrap();

        let mut second = PlatformIntegration::new(Platform::Youtube);
        second.client_id = "two".to_string();
        store.put_integration(&second).await.unwrap();

        // Still exactly one record for the platform
        assert_eq!(store.list_integrations().await.unwrap().len(), 1);
        let stored = store
            .get_integration(Platform::Youtube)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.client_id, "two");
    }

    #[tokio::test]
    async fn test_analytics_overwrite() {
        let store = MemoryStore::new();
        let metrics = PlatformMetrics::from_counts(10, 100, 5, 3, 2, 1);

        let snap = PlatformAnalytics::from_metrics(Platform::Twitter, &metrics, "t1");
        store.put_analytics(&snap).await.unwrap();

        let metrics2 = PlatformMetrics::from_counts(20, 100, 5, 3, 2, 1);
        let snap2 = PlatformAnalytics::from_metrics(Platform::Twitter, &metrics2, "t2");
        store.put_analytics(&snap2).await.unwrap();

        let stored = store.get_analytics(Platform::Twitter).await.unwrap().unwrap();
        assert_eq!(stored.followers, "20");
        assert_eq!(store.list_analytics().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_logs_newest_first() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .append_sync_log(&SyncLog {
                    platform: Platform::Linkedin,
                    sync_type: SyncType::Scheduled,
                    status: SyncStatus::Success,
                    metrics_updated: vec![],
                    error: None,
                    timestamp: format!("2026-01-0{}T00:00:00Z", i + 1),
                })
                .await
                .unwrap();
        }

        let recent = store.recent_sync_logs(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].timestamp, "2026-01-05T00:00:00Z");
        assert_eq!(recent[2].timestamp, "2026-01-03T00:00:00Z");
    }
}
