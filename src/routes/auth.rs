// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin session routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
}

/// Exchange the admin password for a session JWT.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if !password_matches(&body.password, &state.config.admin_password_hash) {
        tracing::warn!("Failed admin login attempt");
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(&state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!("Admin login");
    Ok(Json(LoginResponse { token }))
}

/// Constant-time comparison of the password digest against the
/// configured hash.
fn password_matches(password: &str, expected_hash_hex: &str) -> bool {
    let digest = Sha256::digest(password.as_bytes());
    let digest_hex = hex::encode(digest);
    digest_hex
        .as_bytes()
        .ct_eq(expected_hash_hex.as_bytes())
        .into()
}
