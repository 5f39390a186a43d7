// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer.
//!
//! `SocialStore` is the persistence contract consumed by the sync layer
//! and the admin routes: per-platform integration config and analytics
//! snapshots with upsert semantics, plus an append-only sync log. The
//! backend is pluggable; `MemoryStore` is the in-process implementation.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Platform, PlatformAnalytics, PlatformIntegration, SyncLog};
use std::sync::Arc;

/// Shared handle to a store backend.
pub type Store = Arc<dyn SocialStore>;

#[async_trait::async_trait]
pub trait SocialStore: Send + Sync {
    /// Integration config for one platform, if any has been written.
    async fn get_integration(
        &self,
        platform: Platform,
    ) -> Result<Option<PlatformIntegration>, AppError>;

    /// Create or replace the integration record for its platform.
    async fn put_integration(&self, integration: &PlatformIntegration) -> Result<(), AppError>;

    /// All integration records, in no particular order.
    async fn list_integrations(&self) -> Result<Vec<PlatformIntegration>, AppError>;

    /// Current analytics snapshot for one platform, if any.
    async fn get_analytics(
        &self,
        platform: Platform,
    ) -> Result<Option<PlatformAnalytics>, AppError>;

    /// Full overwrite of the analytics snapshot for its platform.
    async fn put_analytics(&self, analytics: &PlatformAnalytics) -> Result<(), AppError>;

    /// All analytics snapshots, in no particular order.
    async fn list_analytics(&self) -> Result<Vec<PlatformAnalytics>, AppError>;

    /// Append one sync attempt record. Records are never mutated.
    async fn append_sync_log(&self, entry: &SyncLog) -> Result<(), AppError>;

    /// Most recent sync log entries, newest first.
    async fn recent_sync_logs(&self, limit: usize) -> Result<Vec<SyncLog>, AppError>;
}
