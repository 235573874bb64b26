// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! At-rest sealing for the token file.
//!
//! AES-256-GCM with a key derived from a passphrase via HKDF-SHA256.
//! Sealed output is base64(nonce || ciphertext || tag).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hkdf::Hkdf;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;

use super::StoreError;

const HKDF_SALT: &[u8] = b"setoran-dosen token store v1";
const HKDF_INFO: &[u8] = b"token-file-aes-256-gcm";
/// Bound into every ciphertext so a sealed blob from elsewhere won't open.
const AAD: &[u8] = b"setoran-dosen/tokens";

/// Symmetric sealer for the token record.
pub struct Sealer {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl Sealer {
    /// Derive the sealing key from a passphrase.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, StoreError> {
        let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), passphrase.as_bytes());
        let mut okm = [0u8; 32];
        hk.expand(HKDF_INFO, &mut okm)
            .map_err(|e| StoreError::Sealing(format!("HKDF expand failed: {}", e)))?;

        let unbound = UnboundKey::new(&AES_256_GCM, &okm)
            .map_err(|_| StoreError::Sealing("Invalid AES-256-GCM key".to_string()))?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt plaintext, returning base64 text.
    pub fn seal(&self, plaintext: &[u8]) -> Result<String, StoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| StoreError::Sealing("Nonce generation failed".to_string()))?;

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(AAD),
                &mut in_out,
            )
            .map_err(|_| StoreError::Sealing("Encryption failed".to_string()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + in_out.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&in_out);
        Ok(BASE64.encode(out))
    }

    /// Decrypt text produced by [`Sealer::seal`].
    pub fn open(&self, sealed: &str) -> Result<Vec<u8>, StoreError> {
        let bytes = BASE64
            .decode(sealed.trim())
            .map_err(|e| StoreError::Corrupt(format!("Base64 decode failed: {}", e)))?;

        if bytes.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(StoreError::Corrupt("Sealed record too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| StoreError::Corrupt("Bad nonce".to_string()))?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(AAD), &mut in_out)
            .map_err(|_| {
                StoreError::Sealing("Decryption failed (wrong secret or tampered file)".to_string())
            })?;

        Ok(plaintext.to_vec())
    }
}
