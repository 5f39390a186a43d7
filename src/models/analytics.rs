// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analytics snapshot models.
//!
//! `PlatformMetrics` is the numeric shape every fetcher returns;
//! `PlatformAnalytics` is the stored snapshot, kept as numeric strings
//! for the display layer. Each successful sync (or manual edit)
//! overwrites the snapshot wholesale; no history is retained.

use crate::models::Platform;
use serde::{Deserialize, Serialize};

/// The metric names of the common cross-platform shape, in the order
/// they are reported in sync logs.
pub const METRIC_NAMES: [&str; 7] = [
    "followers",
    "engagement_rate",
    "impressions",
    "likes",
    "shares",
    "comments",
    "posts",
];

/// Common metric shape assembled from platform-specific REST calls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlatformMetrics {
    pub followers: u64,
    /// Percentage, rounded to 2 decimals
    pub engagement_rate: f64,
    pub impressions: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub posts: u64,
}

impl PlatformMetrics {
    /// Build the metric set from raw counts, deriving the engagement rate.
    pub fn from_counts(
        followers: u64,
        impressions: u64,
        likes: u64,
        shares: u64,
        comments: u64,
        posts: u64,
    ) -> Self {
        Self {
            followers,
            engagement_rate: engagement_rate(likes, shares, comments, impressions),
            impressions,
            likes,
            shares,
            comments,
            posts,
        }
    }
}

/// Engagement rate: `(likes + shares + comments) / impressions * 100`,
/// rounded to 2 decimals. Zero when there are no impressions.
pub fn engagement_rate(likes: u64, shares: u64, comments: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    let interactions = (likes + shares + comments) as f64;
    let rate = interactions / impressions as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Stored analytics snapshot for one platform (one record per platform).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformAnalytics {
    pub platform: Platform,
    pub followers: String,
    /// Percentage with 2 decimals, e.g. "10.00"
    pub engagement_rate: String,
    pub impressions: String,
    pub likes: String,
    pub shares: String,
    pub comments: String,
    pub posts: String,
    /// When this snapshot was written (RFC3339)
    pub updated_at: String,
}

impl PlatformAnalytics {
    pub fn from_metrics(platform: Platform, metrics: &PlatformMetrics, updated_at: &str) -> Self {
        Self {
            platform,
            followers: metrics.followers.to_string(),
            engagement_rate: format!("{:.2}", metrics.engagement_rate),
            impressions: metrics.impressions.to_string(),
            likes: metrics.likes.to_string(),
            shares: metrics.shares.to_string(),
            comments: metrics.comments.to_string(),
            posts: metrics.posts.to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    /// Empty snapshot, used before the first sync or manual entry.
    pub fn empty(platform: Platform) -> Self {
        Self::from_metrics(platform, &PlatformMetrics::default(), "")
    }
}
