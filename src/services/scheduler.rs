// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Background sync scheduler.
//!
//! A single tokio task ticks once a minute, asks the orchestrator for
//! due platforms, and runs them. Failures end up in the sync log like
//! any other sync; nothing here can take the server down.

use crate::services::sync::SyncService;
use std::sync::Arc;
use std::time::Duration;

/// How often the scheduler checks for due platforms.
const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn the scheduler loop. The handle is held by main for the life of
/// the process.
pub fn start(sync_service: Arc<SyncService>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.tick().await; // Skip first immediate tick

        tracing::info!(interval_secs = TICK_INTERVAL.as_secs(), "Sync scheduler started");

        loop {
            interval.tick().await;

            let outcomes = sync_service.sync_due_platforms().await;
            if outcomes.is_empty() {
                continue;
            }

            let failures = outcomes.iter().filter(|o| !o.success).count();
            tracing::info!(
                synced = outcomes.len(),
                failures,
                "Scheduled sync tick complete"
            );
        }
    })
}
