//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory; deployments
//! inject them as environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Admin frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// SHA-256 hex digest of the admin password
    pub admin_password_hash: String,
    /// JWT signing key for admin session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key signing the OAuth `state` parameter
    pub oauth_state_key: Vec<u8>,
    /// Master key for token encryption at rest
    pub token_encryption_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                .map(|v| v.trim().to_lowercase())
                .map_err(|_| ConfigError::Missing("ADMIN_PASSWORD_HASH"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
            token_encryption_key: env::var("TOKEN_ENCRYPTION_KEY")
                .map_err(|_| ConfigError::Missing("TOKEN_ENCRYPTION_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            // sha256("test-admin-password")
            admin_password_hash:
                "f7a03f48c0e2aa2d5e55ca186c20032ddbf53b7f5f93fce387d65c3f83433e8d".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
            token_encryption_key: b"test_token_encryption_master_key".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
