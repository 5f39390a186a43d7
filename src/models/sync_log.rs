// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync attempt records and outcomes.

use crate::models::Platform;
use serde::{Deserialize, Serialize};

/// What triggered a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    Manual,
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Failure,
}

/// Append-only record of one sync attempt. Never mutated after creation;
/// read for the admin "sync history" view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLog {
    pub platform: Platform,
    pub sync_type: SyncType,
    pub status: SyncStatus,
    /// Metric names written on success (empty on failure)
    pub metrics_updated: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the attempt finished (RFC3339)
    pub timestamp: String,
}

/// Result of one platform sync, returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub success: bool,
    pub platform: Platform,
    pub metrics_updated: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    pub fn ok(platform: Platform, metrics_updated: Vec<String>) -> Self {
        Self {
            success: true,
            platform,
            metrics_updated,
            error: None,
        }
    }

    pub fn failed(platform: Platform, error: String) -> Self {
        Self {
            success: false,
            platform,
            metrics_updated: Vec::new(),
            error: Some(error),
        }
    }
}
