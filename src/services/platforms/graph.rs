// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Facebook and Instagram metrics via the Graph API.
//!
//! Both fetchers resolve their target through `/me/accounts` on the first
//! sync (Facebook: the page itself; Instagram: the business account linked
//! to the page) and use the stored account ID afterwards.

use super::{AccountIdentity, ApiClient, FetchedMetrics, MetricsFetcher};
use crate::error::AppError;
use serde::Deserialize;

const RECENT_POSTS: &str = "10";

fn graph_error(message: &str, platform: &str) -> AppError {
    AppError::PlatformApi {
        platform: platform.to_string(),
        message: message.to_string(),
    }
}

// ─── Facebook ────────────────────────────────────────────────

pub struct FacebookFetcher;

#[async_trait::async_trait]
impl MetricsFetcher for FacebookFetcher {
    async fn fetch(
        &self,
        api: &ApiClient,
        access_token: &str,
        account_id: &str,
    ) -> Result<FetchedMetrics, AppError> {
        let page_id = if account_id.is_empty() {
            let pages: AccountsResponse = api
                .get_json("/me/accounts", &[], access_token)
                .await?;
            pages
                .data
                .into_iter()
                .next()
                .map(|p| p.id)
                .ok_or_else(|| graph_error("No page for authorized account", "facebook"))?
        } else {
            account_id.to_string()
        };

        let page: PageResponse = api
            .get_json(
                &format!("/{}", page_id),
                &[("fields", "name,followers_count,fan_count".to_string())],
                access_token,
            )
            .await?;

        let insights: InsightsResponse = api
            .get_json(
                &format!("/{}/insights", page_id),
                &[
                    ("metric", "page_impressions".to_string()),
                    ("period", "days_28".to_string()),
                ],
                access_token,
            )
            .await?;
        let impressions = insights.latest_value();

        let posts: PostsResponse = api
            .get_json(
                &format!("/{}/posts", page_id),
                &[
                    (
                        "fields",
                        "shares,likes.summary(true),comments.summary(true)".to_string(),
                    ),
                    ("limit", RECENT_POSTS.to_string()),
                ],
                access_token,
            )
            .await?;

        let (mut likes, mut shares, mut comments) = (0u64, 0u64, 0u64);
        let post_count = posts.data.len() as u64;
        for post in posts.data {
            likes += post.likes.map(|l| l.summary.total_count).unwrap_or(0);
            comments += post.comments.map(|c| c.summary.total_count).unwrap_or(0);
            shares += post.shares.map(|s| s.count).unwrap_or(0);
        }

        Ok(FetchedMetrics {
            followers: page.followers_count.or(page.fan_count).unwrap_or(0),
            impressions,
            likes,
            shares,
            comments,
            posts: post_count,
            account: Some(AccountIdentity {
                id: page_id,
                name: page.name,
            }),
        })
    }
}

// ─── Instagram ───────────────────────────────────────────────

pub struct InstagramFetcher;

#[async_trait::async_trait]
impl MetricsFetcher for InstagramFetcher {
    async fn fetch(
        &self,
        api: &ApiClient,
        access_token: &str,
        account_id: &str,
    ) -> Result<FetchedMetrics, AppError> {
        let ig_id = if account_id.is_empty() {
            let pages: AccountsResponse = api
                .get_json(
                    "/me/accounts",
                    &[("fields", "instagram_business_account".to_string())],
                    access_token,
                )
                .await?;
            pages
                .data
                .into_iter()
                .find_map(|p| p.instagram_business_account.map(|a| a.id))
                .ok_or_else(|| {
                    graph_error("No Instagram business account linked to any page", "instagram")
                })?
        } else {
            account_id.to_string()
        };

        let profile: IgProfileResponse = api
            .get_json(
                &format!("/{}", ig_id),
                &[("fields", "username,followers_count,media_count".to_string())],
                access_token,
            )
            .await?;

        let insights: InsightsResponse = api
            .get_json(
                &format!("/{}/insights", ig_id),
                &[
                    ("metric", "impressions".to_string()),
                    ("period", "day".to_string()),
                ],
                access_token,
            )
            .await?;
        let impressions = insights.latest_value();

        let media: IgMediaResponse = api
            .get_json(
                &format!("/{}/media", ig_id),
                &[
                    ("fields", "like_count,comments_count".to_string()),
                    ("limit", RECENT_POSTS.to_string()),
                ],
                access_token,
            )
            .await?;

        let (mut likes, mut comments) = (0u64, 0u64);
        for item in media.data {
            likes += item.like_count.unwrap_or(0);
            comments += item.comments_count.unwrap_or(0);
        }

        Ok(FetchedMetrics {
            followers: profile.followers_count.unwrap_or(0),
            impressions,
            likes,
            // Instagram exposes no share count
            shares: 0,
            comments,
            posts: profile.media_count.unwrap_or(0),
            account: Some(AccountIdentity {
                id: ig_id,
                name: profile.username,
            }),
        })
    }
}

// ─── Response shapes ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    #[serde(default)]
    data: Vec<PageRef>,
}

#[derive(Debug, Deserialize)]
struct PageRef {
    id: String,
    instagram_business_account: Option<IgAccountRef>,
}

#[derive(Debug, Deserialize)]
struct IgAccountRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    name: String,
    followers_count: Option<u64>,
    fan_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct InsightsResponse {
    #[serde(default)]
    data: Vec<InsightMetric>,
}

impl InsightsResponse {
    /// Most recent value of the first requested metric.
    fn latest_value(&self) -> u64 {
        self.data
            .first()
            .and_then(|m| m.values.last())
            .map(|v| v.value)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct InsightMetric {
    #[serde(default)]
    values: Vec<InsightValue>,
}

#[derive(Debug, Deserialize)]
struct InsightValue {
    #[serde(default)]
    value: u64,
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    data: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    likes: Option<Summarized>,
    comments: Option<Summarized>,
    shares: Option<ShareCount>,
}

#[derive(Debug, Deserialize)]
struct Summarized {
    summary: Summary,
}

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct ShareCount {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct IgProfileResponse {
    username: String,
    followers_count: Option<u64>,
    media_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct IgMediaResponse {
    #[serde(default)]
    data: Vec<IgMedia>,
}

#[derive(Debug, Deserialize)]
struct IgMedia {
    like_count: Option<u64>,
    comments_count: Option<u64>,
}
