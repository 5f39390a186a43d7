// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod crypto;
pub mod platforms;
pub mod scheduler;
pub mod sync;
pub mod sync_client;

pub use crypto::TokenCipher;
pub use sync::SyncService;
pub use sync_client::SyncClient;
