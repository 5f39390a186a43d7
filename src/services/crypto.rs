// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Symmetric encryption for OAuth tokens and client secrets at rest.
//!
//! AES-256-GCM with a key derived from the configured master key via
//! HKDF-SHA256. Ciphertext layout: `nonce || ciphertext || tag`,
//! base64-encoded for storage.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hkdf::Hkdf;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use std::sync::Arc;

/// HKDF info string binding derived keys to this purpose.
const KEY_CONTEXT: &[u8] = b"pulseboard-token-encryption-v1";

/// Token encryption service.
#[derive(Clone)]
pub struct TokenCipher {
    key: Option<Arc<LessSafeKey>>,
    rng: SystemRandom,
}

impl TokenCipher {
    /// Derive the AEAD key from the master key and build the cipher.
    pub fn new(master_key: &[u8]) -> Result<Self, AppError> {
        let hk = Hkdf::<Sha256>::new(None, master_key);
        let mut okm = [0u8; 32];
        hk.expand(KEY_CONTEXT, &mut okm)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("HKDF expand failed")))?;

        let unbound = UnboundKey::new(&AES_256_GCM, &okm)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("AEAD key creation failed")))?;

        Ok(Self {
            key: Some(Arc::new(LessSafeKey::new(unbound))),
            rng: SystemRandom::new(),
        })
    }

    /// Create a mock cipher for testing (base64 only, no encryption).
    /// Only available in debug/test builds.
    #[cfg(debug_assertions)]
    pub fn new_mock() -> Self {
        Self {
            key: None,
            rng: SystemRandom::new(),
        }
    }

    /// Encrypt plaintext. Returns base64-encoded `nonce || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, AppError> {
        // Mock mode (debug builds only)
        #[cfg(debug_assertions)]
        {
            if self.key.is_none() {
                return Ok(BASE64.encode(plaintext));
            }
        }

        let key = self
            .key
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Cipher key not initialized")))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Nonce generation failed")))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.as_bytes().to_vec();
        key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Encryption failed")))?;

        let mut out = Vec::with_capacity(NONCE_LEN + in_out.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&in_out);
        Ok(BASE64.encode(out))
    }

    /// Decrypt base64-encoded ciphertext produced by `encrypt`.
    pub fn decrypt(&self, ciphertext_b64: &str) -> Result<String, AppError> {
        // Mock mode (debug builds only)
        #[cfg(debug_assertions)]
        {
            if self.key.is_none() {
                let bytes = BASE64.decode(ciphertext_b64).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Base64 decode failed (mock): {}", e))
                })?;
                return String::from_utf8(bytes).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("UTF-8 decode failed (mock): {}", e))
                });
            }
        }

        let key = self
            .key
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Cipher key not initialized")))?;

        let raw = BASE64
            .decode(ciphertext_b64)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Base64 decode failed: {}", e)))?;

        if raw.len() <= NONCE_LEN {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Ciphertext too short ({} bytes)",
                raw.len()
            )));
        }

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid nonce")))?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Decryption failed")))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("UTF-8 decode failed: {}", e)))
    }

    /// Random URL-safe token (PKCE verifiers, state nonces).
    pub fn random_urlsafe(&self, num_bytes: usize) -> Result<String, AppError> {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let mut bytes = vec![0u8; num_bytes];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Random generation failed")))?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}

/// Helper to encrypt an access/refresh token pair before storing.
pub fn encrypt_tokens(
    cipher: &TokenCipher,
    access_token: &str,
    refresh_token: &str,
) -> Result<(String, String), AppError> {
    let encrypted_access = cipher.encrypt(access_token)?;
    let encrypted_refresh = cipher.encrypt(refresh_token)?;
    Ok((encrypted_access, encrypted_refresh))
}
