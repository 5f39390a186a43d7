// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod analytics;
pub mod platform;
pub mod sync_log;

pub use analytics::{PlatformAnalytics, PlatformMetrics, METRIC_NAMES};
pub use platform::{Platform, PlatformIntegration, SyncInterval};
pub use sync_log::{SyncLog, SyncOutcome, SyncStatus, SyncType};
