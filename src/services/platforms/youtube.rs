// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! YouTube Data API v3 metrics.
//!
//! Channel statistics give followers (subscribers), total impressions
//! (views) and post (video) counts; likes and comments are summed over
//! the ten most recent uploads. YouTube exposes no share count.

use super::{parse_count, AccountIdentity, ApiClient, FetchedMetrics, MetricsFetcher};
use crate::error::AppError;
use serde::Deserialize;

pub struct YoutubeFetcher;

#[async_trait::async_trait]
impl MetricsFetcher for YoutubeFetcher {
    async fn fetch(
        &self,
        api: &ApiClient,
        access_token: &str,
        _account_id: &str,
    ) -> Result<FetchedMetrics, AppError> {
        // Channel statistics for the authorized account
        let channels: ChannelListResponse = api
            .get_json(
                "/channels",
                &[
                    ("part", "snippet,statistics".to_string()),
                    ("mine", "true".to_string()),
                ],
                access_token,
            )
            .await?;

        let channel = channels.items.into_iter().next().ok_or_else(|| {
            AppError::PlatformApi {
                platform: "youtube".to_string(),
                message: "No channel for authorized account".to_string(),
            }
        })?;

        // Recent uploads for like/comment totals
        let search: SearchListResponse = api
            .get_json(
                "/search",
                &[
                    ("part", "id".to_string()),
                    ("forMine", "true".to_string()),
                    ("type", "video".to_string()),
                    ("order", "date".to_string()),
                    ("maxResults", "10".to_string()),
                ],
                access_token,
            )
            .await?;

        let video_ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();

        let (mut likes, mut comments) = (0u64, 0u64);
        if !video_ids.is_empty() {
            let videos: VideoListResponse = api
                .get_json(
                    "/videos",
                    &[
                        ("part", "statistics".to_string()),
                        ("id", video_ids.join(",")),
                    ],
                    access_token,
                )
                .await?;

            for video in videos.items {
                likes += video
                    .statistics
                    .like_count
                    .as_deref()
                    .map(parse_count)
                    .unwrap_or(0);
                comments += video
                    .statistics
                    .comment_count
                    .as_deref()
                    .map(parse_count)
                    .unwrap_or(0);
            }
        }

        Ok(FetchedMetrics {
            followers: parse_count(&channel.statistics.subscriber_count),
            impressions: parse_count(&channel.statistics.view_count),
            likes,
            shares: 0,
            comments,
            posts: parse_count(&channel.statistics.video_count),
            account: Some(AccountIdentity {
                id: channel.id,
                name: channel.snippet.title,
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    id: String,
    snippet: ChannelSnippet,
    statistics: ChannelStatistics,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

/// YouTube serializes counters as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    #[serde(default)]
    view_count: String,
    #[serde(default)]
    subscriber_count: String,
    #[serde(default)]
    video_count: String,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    like_count: Option<String>,
    comment_count: Option<String>,
}
