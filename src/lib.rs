// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Setoran-Dosen: advisor client for Quran memorization progress
//!
//! This crate provides the session core behind the advisor app: login
//! against the identity provider, token persistence, authenticated calls
//! to the setoran API with refresh-on-401, and per-screen controllers that
//! publish request state for a presentation layer to render.

pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use config::Config;
use error::Result;
use services::SessionClient;
use store::{FileTokenStore, TokenStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: SessionClient,
}

impl AppState {
    /// Wire the file token store and session client from config.
    pub fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::from_config(&config)?);
        Self::with_store(config, store)
    }

    /// Same, with a caller-provided token store.
    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let session = SessionClient::new(&config, store)?;
        Ok(Self { config, session })
    }
}
