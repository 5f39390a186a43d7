// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Pulseboard: social-media analytics backend for the admin dashboard
//!
//! This crate provides the backend API that keeps per-platform analytics
//! snapshots in sync with the social platforms' APIs and exposes them to
//! the admin dashboard.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{SyncService, TokenCipher};
use std::sync::Arc;
use store::Store;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub cipher: TokenCipher,
    pub sync_service: Arc<SyncService>,
}
