// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform-specific metric fetching.
//!
//! Each platform implements `MetricsFetcher`: the sequence of REST calls
//! that assembles the common metric shape. Everything protocol-level
//! (endpoints, scopes, refresh grants) lives in the descriptor; the
//! fetchers only know their API's response shapes.

pub mod descriptor;
mod graph;
mod linkedin;
mod twitter;
mod youtube;

pub use descriptor::{descriptor_for, PlatformDescriptor, RefreshGrant, TokenEndpointAuth};

use crate::error::AppError;
use crate::models::Platform;
use serde::de::DeserializeOwned;

/// Account identity resolved from an API response, persisted on first sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub id: String,
    pub name: String,
}

/// Raw counts returned by a fetcher. The engagement rate is derived
/// centrally; platforms that expose no value for a metric report 0.
#[derive(Debug, Clone, Default)]
pub struct FetchedMetrics {
    pub followers: u64,
    pub impressions: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub posts: u64,
    pub account: Option<AccountIdentity>,
}

/// Platform-specific REST calls mapped into the common metric shape.
#[async_trait::async_trait]
pub trait MetricsFetcher: Send + Sync {
    /// Assemble the metric set for the authorized account.
    ///
    /// `account_id` is the stored account/page/channel ID, empty on the
    /// first sync; fetchers resolve it from the API when empty and report
    /// it back via `FetchedMetrics::account`.
    async fn fetch(
        &self,
        api: &ApiClient,
        access_token: &str,
        account_id: &str,
    ) -> Result<FetchedMetrics, AppError>;
}

/// Fetcher for a platform with automated analytics.
pub fn fetcher_for(platform: Platform) -> Option<Box<dyn MetricsFetcher>> {
    match platform {
        Platform::Youtube => Some(Box::new(youtube::YoutubeFetcher)),
        Platform::Facebook => Some(Box::new(graph::FacebookFetcher)),
        Platform::Instagram => Some(Box::new(graph::InstagramFetcher)),
        Platform::Linkedin => Some(Box::new(linkedin::LinkedinFetcher)),
        Platform::Twitter => Some(Box::new(twitter::TwitterFetcher)),
        Platform::Whatsapp | Platform::Viber => None,
    }
}

/// Thin HTTP wrapper for one platform's REST API.
///
/// Maps transport and status errors into `PlatformApi`, tagging 401s so
/// callers can distinguish credential problems from transient failures.
pub struct ApiClient {
    http: reqwest::Client,
    platform: Platform,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, platform: Platform, base_url: String) -> Self {
        Self {
            http,
            platform,
            base_url,
        }
    }

    /// GET `{base_url}{path}` with a bearer token and parse the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        access_token: &str,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| self.api_error(e.to_string()))?;

        self.check_response_json(response).await
    }

    fn api_error(&self, message: String) -> AppError {
        AppError::PlatformApi {
            platform: self.platform.to_string(),
            message,
        }
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!(platform = %self.platform, "Platform rate limit hit (429)");
                return Err(self.api_error("Rate limit exceeded".to_string()));
            }

            if status.as_u16() == 401 {
                return Err(self.api_error(AppError::PLATFORM_TOKEN_ERROR.to_string()));
            }

            return Err(self.api_error(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| self.api_error(format!("JSON parse error: {}", e)))
    }
}

/// Parse a numeric string field (YouTube statistics are strings in JSON).
pub(crate) fn parse_count(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}
