// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static OAuth/API configuration per platform.
//!
//! The descriptor carries everything that varies between platforms at the
//! protocol level: endpoints, scopes, PKCE requirement, how the token
//! endpoint authenticates, and which refresh grant the provider speaks.
//! The sync client is generic over this data; only metric fetching needs
//! per-platform code.

use crate::models::Platform;

/// How the OAuth token endpoint expects client credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEndpointAuth {
    /// client_id + client_secret in the form body
    ClientSecretBody,
    /// HTTP basic auth with client_id:client_secret (Twitter)
    ClientSecretBasic,
}

/// Which grant refreshes an expiring access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshGrant {
    /// Standard `grant_type=refresh_token`
    RefreshToken,
    /// Graph API long-lived token exchange (`grant_type=fb_exchange_token`);
    /// no refresh token is issued or rotated
    FbExchangeToken,
}

/// Per-platform OAuth and API endpoints.
#[derive(Debug, Clone)]
pub struct PlatformDescriptor {
    pub platform: Platform,
    pub auth_url: &'static str,
    pub token_url: &'static str,
    pub scopes: &'static [&'static str],
    pub token_auth: TokenEndpointAuth,
    pub refresh_grant: RefreshGrant,
    /// Twitter requires PKCE on the authorization-code flow
    pub pkce: bool,
    pub api_base: &'static str,
}

/// Descriptor for a platform with automated analytics.
/// Returns `None` for manual-entry-only platforms (WhatsApp, Viber).
pub fn descriptor_for(platform: Platform) -> Option<PlatformDescriptor> {
    let descriptor = match platform {
        Platform::Youtube => PlatformDescriptor {
            platform,
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth",
            token_url: "https://oauth2.googleapis.com/token",
            scopes: &["https://www.googleapis.com/auth/youtube.readonly"],
            token_auth: TokenEndpointAuth::ClientSecretBody,
            refresh_grant: RefreshGrant::RefreshToken,
            pkce: false,
            api_base: "https://www.googleapis.com/youtube/v3",
        },
        Platform::Facebook => PlatformDescriptor {
            platform,
            auth_url: "https://www.facebook.com/v19.0/dialog/oauth",
            token_url: "https://graph.facebook.com/v19.0/oauth/access_token",
            scopes: &["pages_show_list", "pages_read_engagement", "read_insights"],
            token_auth: TokenEndpointAuth::ClientSecretBody,
            refresh_grant: RefreshGrant::FbExchangeToken,
            pkce: false,
            api_base: "https://graph.facebook.com/v19.0",
        },
        Platform::Instagram => PlatformDescriptor {
            platform,
            auth_url: "https://www.facebook.com/v19.0/dialog/oauth",
            token_url: "https://graph.facebook.com/v19.0/oauth/access_token",
            scopes: &[
                "instagram_basic",
                "instagram_manage_insights",
                "pages_show_list",
            ],
            token_auth: TokenEndpointAuth::ClientSecretBody,
            refresh_grant: RefreshGrant::FbExchangeToken,
            pkce: false,
            api_base: "https://graph.facebook.com/v19.0",
        },
        Platform::Linkedin => PlatformDescriptor {
            platform,
            auth_url: "https://www.linkedin.com/oauth/v2/authorization",
            token_url: "https://www.linkedin.com/oauth/v2/accessToken",
            scopes: &["r_organization_social", "rw_organization_admin"],
            token_auth: TokenEndpointAuth::ClientSecretBody,
            refresh_grant: RefreshGrant::RefreshToken,
            pkce: false,
            api_base: "https://api.linkedin.com/v2",
        },
        Platform::Twitter => PlatformDescriptor {
            platform,
            auth_url: "https://twitter.com/i/oauth2/authorize",
            token_url: "https://api.twitter.com/2/oauth2/token",
            scopes: &["tweet.read", "users.read", "offline.access"],
            token_auth: TokenEndpointAuth::ClientSecretBasic,
            refresh_grant: RefreshGrant::RefreshToken,
            pkce: true,
            api_base: "https://api.twitter.com/2",
        },
        Platform::Whatsapp | Platform::Viber => return None,
    };
    Some(descriptor)
}
