// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform OAuth connect routes.
//!
//! `GET /connect/{platform}` redirects the admin to the provider's
//! authorization page; `GET /connect/{platform}/callback` exchanges the
//! returned code for tokens and marks the platform connected. The flow
//! is stateless: the `state` parameter carries the platform name (and
//! the PKCE verifier for Twitter), HMAC-signed so it cannot be tampered
//! with on the round trip through the provider.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::models::Platform;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// PKCE verifier entropy (bytes before base64url encoding).
const PKCE_VERIFIER_BYTES: usize = 32;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/connect/{platform}", get(connect_start))
        .route("/connect/{platform}/callback", get(connect_callback))
}

/// Start the OAuth flow - redirect to the provider's authorization page.
async fn connect_start(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    let platform: Platform = platform.parse()?;
    let client = state.sync_service.client_for(platform)?;

    let integration = state
        .store
        .get_integration(platform)
        .await?
        .ok_or_else(|| AppError::NotConfigured(platform.to_string()))?;
    if integration.client_id.is_empty() {
        return Err(AppError::NotConfigured(platform.to_string()));
    }

    // PKCE verifier rides inside the signed state so no server-side
    // session is needed between start and callback
    let (verifier, challenge) = if client.descriptor().pkce {
        let verifier = state.cipher.random_urlsafe(PKCE_VERIFIER_BYTES)?;
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        (Some(verifier), Some(challenge))
    } else {
        (None, None)
    };

    let oauth_state = sign_state(platform, verifier.as_deref(), &state.config.oauth_state_key)?;
    let callback_url = callback_url(&headers, platform);
    let auth_url = client.authorization_url(
        &integration.client_id,
        &callback_url,
        &oauth_state,
        challenge.as_deref(),
    );

    tracing::info!(platform = %platform, "Starting OAuth flow, redirecting to provider");

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, mark platform connected.
async fn connect_callback(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    headers: axum::http::HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    let platform: Platform = platform.parse()?;

    let (state_platform, verifier) =
        verify_and_decode_state(&params.state, &state.config.oauth_state_key).ok_or_else(
            || AppError::BadRequest("Invalid or tampered state parameter".to_string()),
        )?;
    if state_platform != platform {
        return Err(AppError::BadRequest(
            "State parameter does not match platform".to_string(),
        ));
    }

    let frontend = &state.config.frontend_url;

    // Provider-side denial (admin cancelled the consent screen)
    if let Some(error) = params.error {
        tracing::warn!(platform = %platform, error = %error, "OAuth error from provider");
        let redirect = format!("{}/admin/integrations?error={}", frontend, error);
        return Ok(Redirect::temporary(&redirect));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let client = state.sync_service.client_for(platform)?;
    client
        .handle_oauth_callback(&code, &callback_url(&headers, platform), verifier.as_deref())
        .await?;

    tracing::info!(platform = %platform, "Platform connected");

    let redirect = format!("{}/admin/integrations?connected={}", frontend, platform);
    Ok(Redirect::temporary(&redirect))
}

/// Callback URL as seen by the provider, derived from the request host.
fn callback_url(headers: &axum::http::HeaderMap, platform: Platform) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/connect/{}/callback", scheme, host, platform)
}

/// Sign `platform|verifier|timestamp` with HMAC-SHA256 and base64url
/// encode the whole payload for the URL.
pub fn sign_state(
    platform: Platform,
    pkce_verifier: Option<&str>,
    secret: &[u8],
) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Payload: "platform|verifier_or_dash|timestamp_hex"
    let payload = format!(
        "{}|{}|{:x}",
        platform,
        pkce_verifier.unwrap_or("-"),
        timestamp
    );

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    let signed = format!("{}|{}", payload, signature);
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify the HMAC signature and decode the platform (and PKCE verifier)
/// from the OAuth state parameter.
pub fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<(Platform, Option<String>)> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "platform|verifier|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(4, '|').collect();
    if parts.len() != 4 {
        return None;
    }

    let (platform_raw, verifier_raw, timestamp_hex, signature_hex) =
        (parts[0], parts[1], parts[2], parts[3]);

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}|{}", platform_raw, verifier_raw, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let platform: Platform = platform_raw.parse().ok()?;
    let verifier = match verifier_raw {
        "-" => None,
        v => Some(v.to_string()),
    };

    Some((platform, verifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_state() {
        let secret = b"secret_key";
        let state = sign_state(Platform::Youtube, None, secret).unwrap();

        let (platform, verifier) = verify_and_decode_state(&state, secret).unwrap();
        assert_eq!(platform, Platform::Youtube);
        assert_eq!(verifier, None);
    }

    #[test]
    fn test_state_carries_pkce_verifier() {
        let secret = b"secret_key";
        let state = sign_state(Platform::Twitter, Some("my-verifier"), secret).unwrap();

        let (platform, verifier) = verify_and_decode_state(&state, secret).unwrap();
        assert_eq!(platform, Platform::Twitter);
        assert_eq!(verifier.as_deref(), Some("my-verifier"));
    }

    #[test]
    fn test_state_wrong_secret_rejected() {
        let state = sign_state(Platform::Linkedin, None, b"secret_key").unwrap();
        assert!(verify_and_decode_state(&state, b"wrong_key").is_none());
    }

    #[test]
    fn test_state_tampered_platform_rejected() {
        let secret = b"secret_key";
        let state = sign_state(Platform::Linkedin, None, secret).unwrap();

        // Swap the platform inside the signed payload
        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(&state).unwrap()).unwrap();
        let tampered = decoded.replacen("linkedin", "facebook", 1);
        let tampered_state = URL_SAFE_NO_PAD.encode(tampered.as_bytes());

        assert!(verify_and_decode_state(&tampered_state, secret).is_none());
    }

    #[test]
    fn test_state_malformed_rejected() {
        let encoded = URL_SAFE_NO_PAD.encode("invalid|format");
        assert!(verify_and_decode_state(&encoded, b"secret_key").is_none());
        assert!(verify_and_decode_state("not-base64!!!", b"secret_key").is_none());
    }
}
