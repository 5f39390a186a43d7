// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Platform has no credentials stored, or has been disconnected.
    #[error("Platform {0} is not configured for syncing")]
    NotConfigured(String),

    /// The OAuth refresh grant was rejected by the provider.
    #[error("Token refresh failed for {platform}: {message}")]
    TokenRefreshFailed { platform: String, message: String },

    /// An upstream platform REST call failed.
    #[error("{platform} API error: {message}")]
    PlatformApi { platform: String, message: String },

    /// Platform has no public analytics API (manual entry only).
    #[error("Platform {0} has no automated analytics; use manual entry")]
    UnsupportedPlatform(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Upstream message marker for expired/revoked platform credentials.
    pub const PLATFORM_TOKEN_ERROR: &'static str = "Token expired or revoked";

    /// Whether this error indicates invalid platform credentials
    /// (as opposed to a transient upstream failure).
    pub fn is_token_error(&self) -> bool {
        match self {
            AppError::TokenRefreshFailed { .. } => true,
            AppError::PlatformApi { message, .. } => {
                let lower = message.to_lowercase();
                lower.contains("token") || lower.contains("unauthorized")
            }
            _ => false,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::NotConfigured(platform) => (
                StatusCode::CONFLICT,
                "not_configured",
                Some(format!("Platform {} is not configured", platform)),
            ),
            AppError::TokenRefreshFailed { platform, message } => (
                StatusCode::BAD_GATEWAY,
                "token_refresh_failed",
                Some(format!("{}: {}", platform, message)),
            ),
            AppError::PlatformApi { platform, message } => (
                StatusCode::BAD_GATEWAY,
                "platform_error",
                Some(format!("{}: {}", platform, message)),
            ),
            AppError::UnsupportedPlatform(platform) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unsupported_platform",
                Some(format!(
                    "{} has no automated analytics; use manual entry",
                    platform
                )),
            ),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
