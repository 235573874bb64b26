// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token store backed by a single file on local disk.
//!
//! Writes go to a sibling temp file which is then renamed over the target,
//! so a reader sees either the old record or the new one, never a mix.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sealing::Sealer;
use super::{StoreError, TokenStore};
use crate::models::Tokens;

/// On-disk record.
#[derive(Serialize, Deserialize)]
struct StoredTokens {
    tokens: Tokens,
    saved_at: DateTime<Utc>,
}

/// File-backed token store, optionally sealed with a passphrase.
pub struct FileTokenStore {
    path: PathBuf,
    sealer: Option<Sealer>,
    /// Serializes all file access from this process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Plain JSON store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sealer: None,
            lock: Mutex::new(()),
        }
    }

    /// Store sealed with a key derived from `passphrase`.
    pub fn sealed(path: impl Into<PathBuf>, passphrase: &str) -> Result<Self, StoreError> {
        Ok(Self {
            path: path.into(),
            sealer: Some(Sealer::from_passphrase(passphrase)?),
            lock: Mutex::new(()),
        })
    }

    /// Build from configuration; warns when no sealing secret is set.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, StoreError> {
        match &config.token_store_secret {
            Some(secret) => Self::sealed(&config.token_store_path, secret),
            None => {
                tracing::warn!(
                    path = %config.token_store_path.display(),
                    "TOKEN_STORE_SECRET not set, tokens will be stored unsealed"
                );
                Ok(Self::new(&config.token_store_path))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the current record was written, if there is one.
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.read_record()?.map(|r| r.saved_at))
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.lock
            .lock()
            .map_err(|_| StoreError::Io("Token store lock poisoned".to_string()))
    }

    fn read_record(&self) -> Result<Option<StoredTokens>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let json = match &self.sealer {
            Some(sealer) => sealer.open(&contents)?,
            None => contents.into_bytes(),
        };

        serde_json::from_slice(&json)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    fn write_record(&self, record: &StoredTokens) -> Result<(), StoreError> {
        let json =
            serde_json::to_vec(record).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let contents = match &self.sealer {
            Some(sealer) => sealer.seal(&json)?.into_bytes(),
            None => json,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.tmp_path();
        {
            let mut file = open_private(&tmp)?;
            file.write_all(&contents)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Delete the record; a missing file is fine. Caller holds the lock.
    fn remove_record(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Tokens cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tokens".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl TokenStore for FileTokenStore {
    fn save(&self, tokens: &Tokens) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        self.write_record(&StoredTokens {
            tokens: tokens.clone(),
            saved_at: Utc::now(),
        })?;
        tracing::debug!(path = %self.path.display(), "Tokens saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<Tokens>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.read_record()?.map(|r| r.tokens))
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        self.remove_record()
    }

    fn clear_if_refresh_token(&self, refresh_token: &str) -> Result<bool, StoreError> {
        let _guard = self.guard()?;
        // An unreadable record can't hold anything worth keeping.
        let matches = match self.read_record() {
            Ok(Some(record)) => record.tokens.refresh_token == refresh_token,
            Ok(None) => return Ok(false),
            Err(e) => {
                tracing::warn!(error = %e, "Token record unreadable, clearing");
                true
            }
        };
        if matches {
            self.remove_record()?;
        }
        Ok(matches)
    }
}
