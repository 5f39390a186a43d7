// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Twitter/X API v2 metrics.
//!
//! `users/me` public_metrics give followers and total posts; the ten most
//! recent tweets' public_metrics are summed for likes (like_count),
//! shares (retweet_count), comments (reply_count) and impressions.

use super::{AccountIdentity, ApiClient, FetchedMetrics, MetricsFetcher};
use crate::error::AppError;
use serde::Deserialize;

pub struct TwitterFetcher;

#[async_trait::async_trait]
impl MetricsFetcher for TwitterFetcher {
    async fn fetch(
        &self,
        api: &ApiClient,
        access_token: &str,
        account_id: &str,
    ) -> Result<FetchedMetrics, AppError> {
        let me: UserResponse = api
            .get_json(
                "/users/me",
                &[("user.fields", "public_metrics".to_string())],
                access_token,
            )
            .await?;

        let user_id = if account_id.is_empty() {
            me.data.id.clone()
        } else {
            account_id.to_string()
        };

        let tweets: TweetsResponse = api
            .get_json(
                &format!("/users/{}/tweets", user_id),
                &[
                    ("max_results", "10".to_string()),
                    ("tweet.fields", "public_metrics".to_string()),
                ],
                access_token,
            )
            .await?;

        let (mut impressions, mut likes, mut shares, mut comments) = (0u64, 0u64, 0u64, 0u64);
        for tweet in tweets.data.unwrap_or_default() {
            let metrics = tweet.public_metrics;
            impressions += metrics.impression_count.unwrap_or(0);
            likes += metrics.like_count;
            shares += metrics.retweet_count;
            comments += metrics.reply_count;
        }

        Ok(FetchedMetrics {
            followers: me.data.public_metrics.followers_count,
            impressions,
            likes,
            shares,
            comments,
            posts: me.data.public_metrics.tweet_count,
            account: Some(AccountIdentity {
                id: me.data.id,
                name: me.data.username,
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    data: User,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
    public_metrics: UserPublicMetrics,
}

#[derive(Debug, Deserialize)]
struct UserPublicMetrics {
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    tweet_count: u64,
}

#[derive(Debug, Deserialize)]
struct TweetsResponse {
    data: Option<Vec<Tweet>>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    public_metrics: TweetPublicMetrics,
}

#[derive(Debug, Deserialize)]
struct TweetPublicMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
    impression_count: Option<u64>,
}
