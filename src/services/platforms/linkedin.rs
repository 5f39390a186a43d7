// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn organization metrics.
//!
//! Follower count comes from `networkSizes`, interaction totals from
//! `organizationalEntityShareStatistics`, post count from the recent
//! shares listing. The organization is resolved via `organizationAcls`
//! on the first sync.

use super::{AccountIdentity, ApiClient, FetchedMetrics, MetricsFetcher};
use crate::error::AppError;
use serde::Deserialize;

pub struct LinkedinFetcher;

#[async_trait::async_trait]
impl MetricsFetcher for LinkedinFetcher {
    async fn fetch(
        &self,
        api: &ApiClient,
        access_token: &str,
        account_id: &str,
    ) -> Result<FetchedMetrics, AppError> {
        let (org_id, org_name) = if account_id.is_empty() {
            resolve_organization(api, access_token).await?
        } else {
            (account_id.to_string(), String::new())
        };
        let org_urn = format!("urn:li:organization:{}", org_id);

        let network: NetworkSizeResponse = api
            .get_json(
                &format!("/networkSizes/{}", org_urn),
                &[("edgeType", "CompanyFollowedByMember".to_string())],
                access_token,
            )
            .await?;

        let stats: ShareStatisticsResponse = api
            .get_json(
                "/organizationalEntityShareStatistics",
                &[
                    ("q", "organizationalEntity".to_string()),
                    ("organizationalEntity", org_urn.clone()),
                ],
                access_token,
            )
            .await?;
        let totals = stats
            .elements
            .into_iter()
            .next()
            .map(|e| e.total_share_statistics)
            .unwrap_or_default();

        let shares_list: SharesResponse = api
            .get_json(
                "/shares",
                &[
                    ("q", "owners".to_string()),
                    ("owners", org_urn),
                    ("count", "50".to_string()),
                ],
                access_token,
            )
            .await?;

        Ok(FetchedMetrics {
            followers: network.first_degree_size,
            impressions: totals.impression_count,
            likes: totals.like_count,
            shares: totals.share_count,
            comments: totals.comment_count,
            posts: shares_list.elements.len() as u64,
            account: Some(AccountIdentity {
                id: org_id,
                name: org_name,
            }),
        })
    }
}

/// First organization the authorized member administers.
async fn resolve_organization(
    api: &ApiClient,
    access_token: &str,
) -> Result<(String, String), AppError> {
    let acls: OrganizationAclsResponse = api
        .get_json(
            "/organizationAcls",
            &[("q", "roleAssignee".to_string())],
            access_token,
        )
        .await?;

    let urn = acls
        .elements
        .into_iter()
        .next()
        .map(|e| e.organization)
        .ok_or_else(|| AppError::PlatformApi {
            platform: "linkedin".to_string(),
            message: "No organization for authorized member".to_string(),
        })?;

    // "urn:li:organization:123" -> "123"
    let org_id = urn.rsplit(':').next().unwrap_or(&urn).to_string();

    let org: OrganizationResponse = api
        .get_json(&format!("/organizations/{}", org_id), &[], access_token)
        .await?;

    Ok((org_id, org.localized_name))
}

#[derive(Debug, Deserialize)]
struct OrganizationAclsResponse {
    #[serde(default)]
    elements: Vec<OrganizationAcl>,
}

#[derive(Debug, Deserialize)]
struct OrganizationAcl {
    organization: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationResponse {
    #[serde(default)]
    localized_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkSizeResponse {
    #[serde(default)]
    first_degree_size: u64,
}

#[derive(Debug, Deserialize)]
struct ShareStatisticsResponse {
    #[serde(default)]
    elements: Vec<ShareStatisticsElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareStatisticsElement {
    total_share_statistics: ShareTotals,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ShareTotals {
    #[serde(default)]
    impression_count: u64,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    share_count: u64,
    #[serde(default)]
    comment_count: u64,
}

#[derive(Debug, Deserialize)]
struct SharesResponse {
    #[serde(default)]
    elements: Vec<serde_json::Value>,
}
