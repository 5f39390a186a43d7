// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pulseboard API Server
//!
//! Syncs social-media analytics from the platforms' APIs into per-platform
//! snapshots and serves them to the admin dashboard.

use pulseboard::{
    config::Config,
    services::{scheduler, SyncService, TokenCipher},
    store::MemoryStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Pulseboard API");

    // Storage backend (in-memory)
    let store: pulseboard::store::Store = Arc::new(MemoryStore::new());

    // Token encryption at rest
    let cipher = TokenCipher::new(&config.token_encryption_key)
        .expect("Failed to initialize token cipher");
    tracing::info!("Token cipher initialized");

    // Sync orchestrator with shared per-platform locks
    let sync_service = Arc::new(SyncService::new(store.clone(), cipher.clone()));

    // Background scheduler for auto-sync platforms
    let _scheduler = scheduler::start(sync_service.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        cipher,
        sync_service,
    });

    // Build router
    let app = pulseboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pulseboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
