// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local persistence for the session tokens.
//!
//! The store is the only shared mutable resource in the client. Each
//! implementation serializes its own writes; concurrent saves are still
//! last-write-wins.

pub mod file;
pub mod sealing;

pub use file::FileTokenStore;

use crate::models::Tokens;
use std::sync::RwLock;

/// Token store errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Corrupt token record: {0}")]
    Corrupt(String),

    #[error("Sealing error: {0}")]
    Sealing(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// Persists the access/refresh/id token triple.
///
/// Tokens are opaque: nothing here inspects or validates them.
pub trait TokenStore: Send + Sync {
    /// Replace all three tokens at once.
    fn save(&self, tokens: &Tokens) -> Result<(), StoreError>;

    /// Current token triple, if any.
    fn load(&self) -> Result<Option<Tokens>, StoreError>;

    /// Remove all tokens. Idempotent.
    fn clear(&self) -> Result<(), StoreError>;

    /// Remove all tokens only if the stored refresh token is `refresh_token`.
    ///
    /// Compare and clear happen under one lock, so a concurrent `save` of
    /// fresh tokens is never wiped. Returns whether anything was removed.
    fn clear_if_refresh_token(&self, refresh_token: &str) -> Result<bool, StoreError>;

    fn access_token(&self) -> Option<String> {
        self.load_or_absent()
            .map(|t| t.access_token)
            .filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.load_or_absent()
            .map(|t| t.refresh_token)
            .filter(|t| !t.is_empty())
    }

    fn id_token(&self) -> Option<String> {
        self.load_or_absent()
            .map(|t| t.id_token)
            .filter(|t| !t.is_empty())
    }

    /// `load()` with read failures reported as absent.
    fn load_or_absent(&self) -> Option<Tokens> {
        match self.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "Token store unreadable, treating as signed out");
                None
            }
        }
    }
}

/// Process-local store; lost on exit.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<Tokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with tokens.
    pub fn with_tokens(tokens: Tokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, tokens: &Tokens) -> Result<(), StoreError> {
        let mut guard = self
            .tokens
            .write()
            .map_err(|_| StoreError::Io("Token store lock poisoned".to_string()))?;
        *guard = Some(tokens.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Tokens>, StoreError> {
        let guard = self
            .tokens
            .read()
            .map_err(|_| StoreError::Io("Token store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self
            .tokens
            .write()
            .map_err(|_| StoreError::Io("Token store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }

    fn clear_if_refresh_token(&self, refresh_token: &str) -> Result<bool, StoreError> {
        let mut guard = self
            .tokens
            .write()
            .map_err(|_| StoreError::Io("Token store lock poisoned".to_string()))?;
        match guard.as_ref() {
            Some(t) if t.refresh_token == refresh_token => {
                *guard = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
