// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generic platform sync client.
//!
//! One client handles every platform: the descriptor supplies endpoints,
//! scopes and grant shapes, a `MetricsFetcher` supplies the API calls.
//! Handles:
//! - The sync template (config -> token freshness -> fetch -> persist -> log)
//! - OAuth refresh grants, with rotated tokens re-encrypted and persisted
//! - Authorization-code exchange for the connect flow

use crate::error::AppError;
use crate::models::{
    Platform, PlatformAnalytics, PlatformIntegration, PlatformMetrics, SyncLog, SyncOutcome,
    SyncStatus, SyncType, METRIC_NAMES,
};
use crate::services::crypto::{encrypt_tokens, TokenCipher};
use crate::services::platforms::{
    descriptor_for, fetcher_for, ApiClient, MetricsFetcher, PlatformDescriptor, RefreshGrant,
    TokenEndpointAuth,
};
use crate::store::Store;
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};
use chrono::{Duration, Utc};
use serde::Deserialize;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Token endpoint response (refresh and code-exchange grants).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Providers that omit `expires_in` get a conservative one hour.
    fn expires_at(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::seconds(self.expires_in.unwrap_or(3600))
    }
}

/// Sync client for one platform.
pub struct SyncClient {
    descriptor: PlatformDescriptor,
    fetcher: Box<dyn MetricsFetcher>,
    http: reqwest::Client,
    store: Store,
    cipher: TokenCipher,
    // Endpoint copies so tests can point at a local server
    token_url: String,
    api_base: String,
}

impl SyncClient {
    /// Build the client for a platform.
    ///
    /// WhatsApp and Viber are recognized platforms without analytics APIs;
    /// requesting a client for them fails before any network call. That is
    /// a product decision, not a missing integration.
    pub fn for_platform(
        platform: Platform,
        store: Store,
        cipher: TokenCipher,
        http: reqwest::Client,
    ) -> Result<Self, AppError> {
        let descriptor = descriptor_for(platform)
            .ok_or_else(|| AppError::UnsupportedPlatform(platform.to_string()))?;
        let fetcher = fetcher_for(platform)
            .ok_or_else(|| AppError::UnsupportedPlatform(platform.to_string()))?;

        let token_url = descriptor.token_url.to_string();
        let api_base = descriptor.api_base.to_string();

        Ok(Self {
            descriptor,
            fetcher,
            http,
            store,
            cipher,
            token_url,
            api_base,
        })
    }

    /// Override endpoints (tests point these at a local mock server).
    pub fn with_base_urls(mut self, token_url: String, api_base: String) -> Self {
        self.token_url = token_url;
        self.api_base = api_base;
        self
    }

    pub fn platform(&self) -> Platform {
        self.descriptor.platform
    }

    pub fn descriptor(&self) -> &PlatformDescriptor {
        &self.descriptor
    }

    // ─── Sync Template ───────────────────────────────────────────────────

    /// Run one end-to-end sync for this platform.
    ///
    /// Every failure is recorded as a SyncLog failure entry and folded
    /// into the returned outcome; nothing propagates to the caller. A
    /// failed token refresh aborts the attempt without retrying.
    pub async fn sync(&self, sync_type: SyncType) -> SyncOutcome {
        let platform = self.platform();

        let outcome = match self.run_sync().await {
            Ok(metrics_updated) => SyncOutcome::ok(platform, metrics_updated),
            Err(e) => {
                tracing::warn!(platform = %platform, error = %e, "Sync failed");
                SyncOutcome::failed(platform, e.to_string())
            }
        };

        let entry = SyncLog {
            platform,
            sync_type,
            status: if outcome.success {
                SyncStatus::Success
            } else {
                SyncStatus::Failure
            },
            metrics_updated: outcome.metrics_updated.clone(),
            error: outcome.error.clone(),
            timestamp: format_utc_rfc3339(Utc::now()),
        };
        if let Err(e) = self.store.append_sync_log(&entry).await {
            tracing::error!(platform = %platform, error = %e, "Failed to append sync log");
        }

        outcome
    }

    async fn run_sync(&self) -> Result<Vec<String>, AppError> {
        let platform = self.platform();

        // 1. Load config; absent or disconnected platforms cannot sync
        let mut integration = self
            .store
            .get_integration(platform)
            .await?
            .ok_or_else(|| AppError::NotConfigured(platform.to_string()))?;

        if !integration.is_connected || integration.access_token_encrypted.is_empty() {
            return Err(AppError::NotConfigured(platform.to_string()));
        }

        // Manual-mode platforms keep their hand-entered metrics
        if integration.manual_mode {
            return Err(AppError::UnsupportedPlatform(platform.to_string()));
        }

        // 2. Ensure token freshness; a refresh failure aborts the sync
        //    and is NOT retried within this invocation
        let access_token = if token_needs_refresh(&integration.token_expires_at) {
            tracing::info!(platform = %platform, "Access token expired, refreshing");
            self.refresh_access_token(&mut integration).await?
        } else {
            self.cipher.decrypt(&integration.access_token_encrypted)?
        };

        // 3. Fetch metrics via the platform's REST calls
        let api = ApiClient::new(self.http.clone(), platform, self.api_base.clone());
        let fetched = self
            .fetcher
            .fetch(&api, &access_token, &integration.account_id)
            .await?;

        // 4. Populate account identity on first successful call
        if integration.account_id.is_empty() {
            if let Some(account) = &fetched.account {
                integration.account_id = account.id.clone();
                integration.account_name = account.name.clone();
            }
        }

        // 5. Full overwrite of the analytics snapshot
        let now = format_utc_rfc3339(Utc::now());
        let metrics = PlatformMetrics::from_counts(
            fetched.followers,
            fetched.impressions,
            fetched.likes,
            fetched.shares,
            fetched.comments,
            fetched.posts,
        );
        self.store
            .put_analytics(&PlatformAnalytics::from_metrics(platform, &metrics, &now))
            .await?;

        // 6. Advance the sync schedule
        integration.last_sync_at = now;
        integration.next_sync_at =
            format_utc_rfc3339(Utc::now() + integration.sync_interval.as_duration());
        self.store.put_integration(&integration).await?;

        Ok(METRIC_NAMES.iter().map(|m| m.to_string()).collect())
    }

    // ─── Token Refresh ───────────────────────────────────────────────────

    /// Run the platform's refresh grant and persist the new tokens
    /// (encrypted) before returning the fresh access token.
    pub async fn refresh_access_token(
        &self,
        integration: &mut PlatformIntegration,
    ) -> Result<String, AppError> {
        let platform = self.platform();
        let refresh_error = |message: String| AppError::TokenRefreshFailed {
            platform: platform.to_string(),
            message,
        };

        if integration.client_secret_encrypted.is_empty() {
            return Err(refresh_error("No client secret configured".to_string()));
        }
        let client_secret = self.cipher.decrypt(&integration.client_secret_encrypted)?;

        let response = match self.descriptor.refresh_grant {
            RefreshGrant::RefreshToken => {
                if integration.refresh_token_encrypted.is_empty() {
                    return Err(refresh_error("No refresh token stored".to_string()));
                }
                let refresh_token = self.cipher.decrypt(&integration.refresh_token_encrypted)?;
                self.post_token_form(
                    &[
                        ("grant_type", "refresh_token"),
                        ("refresh_token", refresh_token.as_str()),
                    ],
                    &integration.client_id,
                    &client_secret,
                )
                .await
                .map_err(refresh_error)?
            }
            RefreshGrant::FbExchangeToken => {
                // Graph exchanges the current (still valid-ish) token for a
                // fresh long-lived one; no refresh token exists
                let current = self.cipher.decrypt(&integration.access_token_encrypted)?;
                self.post_token_form(
                    &[
                        ("grant_type", "fb_exchange_token"),
                        ("fb_exchange_token", current.as_str()),
                    ],
                    &integration.client_id,
                    &client_secret,
                )
                .await
                .map_err(refresh_error)?
            }
        };

        // Persist before any API call so a crash cannot lose the rotation
        integration.access_token_encrypted = self.cipher.encrypt(&response.access_token)?;
        if let Some(rotated) = &response.refresh_token {
            integration.refresh_token_encrypted = self.cipher.encrypt(rotated)?;
        }
        integration.token_expires_at = format_utc_rfc3339(response.expires_at());
        self.store.put_integration(integration).await?;

        tracing::info!(platform = %platform, "Token refreshed and stored");
        Ok(response.access_token)
    }

    // ─── OAuth Connect Flow ──────────────────────────────────────────────

    /// Authorization URL for the admin connect redirect.
    pub fn authorization_url(
        &self,
        client_id: &str,
        redirect_uri: &str,
        state: &str,
        pkce_challenge: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.descriptor.auth_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&self.descriptor.scopes.join(" ")),
            state,
        );
        if let Some(challenge) = pkce_challenge {
            url.push_str(&format!(
                "&code_challenge={}&code_challenge_method=S256",
                challenge
            ));
        }
        url
    }

    /// Exchange an authorization code, store the encrypted tokens, and
    /// mark the platform connected.
    pub async fn handle_oauth_callback(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: Option<&str>,
    ) -> Result<(), AppError> {
        let platform = self.platform();

        let mut integration = self
            .store
            .get_integration(platform)
            .await?
            .ok_or_else(|| AppError::NotConfigured(platform.to_string()))?;

        if integration.client_id.is_empty() || integration.client_secret_encrypted.is_empty() {
            return Err(AppError::NotConfigured(platform.to_string()));
        }
        let client_secret = self.cipher.decrypt(&integration.client_secret_encrypted)?;

        let mut form = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", redirect_uri.to_string()),
        ];
        if let Some(verifier) = code_verifier {
            form.push(("code_verifier", verifier.to_string()));
        }
        let form_refs: Vec<(&str, &str)> =
            form.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let response = self
            .post_token_form(&form_refs, &integration.client_id, &client_secret)
            .await
            .map_err(|message| AppError::PlatformApi {
                platform: platform.to_string(),
                message: format!("Token exchange failed: {}", message),
            })?;

        let refresh_token = response.refresh_token.clone().unwrap_or_default();
        let (enc_access, enc_refresh) =
            encrypt_tokens(&self.cipher, &response.access_token, &refresh_token)?;

        integration.access_token_encrypted = enc_access;
        integration.refresh_token_encrypted = if refresh_token.is_empty() {
            String::new()
        } else {
            enc_refresh
        };
        integration.token_expires_at = format_utc_rfc3339(response.expires_at());
        integration.is_connected = true;
        self.store.put_integration(&integration).await?;

        tracing::info!(platform = %platform, "OAuth callback handled, tokens stored");
        Ok(())
    }

    /// POST a grant to the token endpoint with the descriptor's client
    /// authentication style. Returns the upstream message on failure.
    async fn post_token_form(
        &self,
        form: &[(&str, &str)],
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenResponse, String> {
        let mut request = self.http.post(&self.token_url);

        let mut body: Vec<(&str, &str)> = form.to_vec();
        match self.descriptor.token_auth {
            TokenEndpointAuth::ClientSecretBody => {
                body.push(("client_id", client_id));
                body.push(("client_secret", client_secret));
            }
            TokenEndpointAuth::ClientSecretBasic => {
                request = request.basic_auth(client_id, Some(client_secret));
                body.push(("client_id", client_id));
            }
        }

        let response = request
            .form(&body)
            .send()
            .await
            .map_err(|e| format!("Token request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status, text));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse token response: {}", e))
    }
}

/// Whether the stored expiry is at/past due (with the refresh margin).
/// Missing or unparseable expiries count as expired.
fn token_needs_refresh(expires_at: &str) -> bool {
    match parse_utc_rfc3339(expires_at) {
        Some(expiry) => Utc::now() + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= expiry,
        None => true,
    }
}
