// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform identifiers and per-platform integration config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One external social-media service.
///
/// `WhatsApp` and `Viber` are recognized identifiers but expose no public
/// analytics API; their metrics can only be entered by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Facebook,
    Instagram,
    Linkedin,
    Twitter,
    Whatsapp,
    Viber,
}

impl Platform {
    /// Platforms the sync layer can pull metrics for automatically.
    pub const SYNCABLE: [Platform; 5] = [
        Platform::Youtube,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Twitter,
    ];

    /// Every recognized platform, including manual-entry-only ones.
    pub const ALL: [Platform; 7] = [
        Platform::Youtube,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Whatsapp,
        Platform::Viber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Whatsapp => "whatsapp",
            Platform::Viber => "viber",
        }
    }

    /// Whether this platform has a public analytics API.
    pub fn supports_api_sync(&self) -> bool {
        !matches!(self, Platform::Whatsapp | Platform::Viber)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Platform::Youtube),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" => Ok(Platform::Twitter),
            "whatsapp" => Ok(Platform::Whatsapp),
            "viber" => Ok(Platform::Viber),
            other => Err(crate::error::AppError::BadRequest(format!(
                "Unknown platform: {}",
                other
            ))),
        }
    }
}

/// How often a platform is auto-synced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncInterval {
    #[serde(rename = "15m")]
    Minutes15,
    #[serde(rename = "30m")]
    Minutes30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "6h")]
    Hours6,
    #[serde(rename = "24h")]
    Hours24,
}

impl SyncInterval {
    pub fn as_duration(&self) -> chrono::Duration {
        match self {
            SyncInterval::Minutes15 => chrono::Duration::minutes(15),
            SyncInterval::Minutes30 => chrono::Duration::minutes(30),
            SyncInterval::Hour1 => chrono::Duration::hours(1),
            SyncInterval::Hours6 => chrono::Duration::hours(6),
            SyncInterval::Hours24 => chrono::Duration::hours(24),
        }
    }
}

impl Default for SyncInterval {
    fn default() -> Self {
        SyncInterval::Hours24
    }
}

/// Integration config for one platform (one record per platform).
///
/// OAuth secrets and tokens are stored encrypted (base64 ciphertext);
/// empty string means "not set". Records are never hard-deleted: a
/// disconnect clears the tokens and flips `is_connected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformIntegration {
    pub platform: Platform,
    /// OAuth client ID (public)
    #[serde(default)]
    pub client_id: String,
    /// Encrypted OAuth client secret (base64)
    #[serde(default)]
    pub client_secret_encrypted: String,
    /// Encrypted access token (base64)
    #[serde(default)]
    pub access_token_encrypted: String,
    /// Encrypted refresh token (base64)
    #[serde(default)]
    pub refresh_token_encrypted: String,
    /// When the access token expires (RFC3339)
    #[serde(default)]
    pub token_expires_at: String,
    /// Platform-side account/page/channel ID
    #[serde(default)]
    pub account_id: String,
    /// Human-readable account name
    #[serde(default)]
    pub account_name: String,
    /// Tokens present and usable
    #[serde(default)]
    pub is_connected: bool,
    /// Eligible for scheduled syncs
    #[serde(default)]
    pub auto_sync: bool,
    #[serde(default)]
    pub sync_interval: SyncInterval,
    /// Metrics are hand-entered; never targeted by the scheduler or bulk sync
    #[serde(default)]
    pub manual_mode: bool,
    /// Last successful sync (RFC3339)
    #[serde(default)]
    pub last_sync_at: String,
    /// Next scheduled sync (RFC3339)
    #[serde(default)]
    pub next_sync_at: String,
    /// Shown on the public site
    #[serde(default)]
    pub published: bool,
}

impl PlatformIntegration {
    /// Fresh unconfigured record for a platform.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            client_id: String::new(),
            client_secret_encrypted: String::new(),
            access_token_encrypted: String::new(),
            refresh_token_encrypted: String::new(),
            token_expires_at: String::new(),
            account_id: String::new(),
            account_name: String::new(),
            is_connected: false,
            auto_sync: false,
            sync_interval: SyncInterval::default(),
            manual_mode: !platform.supports_api_sync(),
            last_sync_at: String::new(),
            next_sync_at: String::new(),
            published: false,
        }
    }

    /// Clear tokens and mark disconnected. Credentials (client id/secret)
    /// and sync history survive so the platform can be reconnected.
    pub fn disconnect(&mut self) {
        self.access_token_encrypted.clear();
        self.refresh_token_encrypted.clear();
        self.token_expires_at.clear();
        self.is_connected = false;
    }
}
