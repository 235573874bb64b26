// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! Identity-provider client credentials are never compiled in; they come
//! from the environment (or a local `.env` file) like every other setting.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Scope requested on password grants unless overridden.
pub const DEFAULT_SCOPE: &str = "openid profile email";

/// Where tokens are kept when `TOKEN_STORE_PATH` is unset.
pub const DEFAULT_TOKEN_STORE_PATH: &str = ".setoran/tokens.json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    // --- Endpoints ---
    /// Full URL of the identity provider's token endpoint
    pub identity_token_url: String,
    /// Base URL of the setoran REST API (no trailing slash)
    pub api_base_url: String,

    // --- OAuth client ---
    /// OIDC client ID
    pub client_id: String,
    /// OIDC client secret
    pub client_secret: String,
    /// Scope sent with password grants
    pub scope: String,

    // --- Local storage ---
    /// Token file location
    pub token_store_path: PathBuf,
    /// Passphrase used to seal the token file (unsealed when absent)
    pub token_store_secret: Option<String>,

    /// Per-request timeout for all outbound HTTP calls
    pub http_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("identity_token_url", &self.identity_token_url)
            .field("api_base_url", &self.api_base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("token_store_path", &self.token_store_path)
            .field(
                "token_store_secret",
                &self.token_store_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Config {
    /// Config for tests, pointing both services at the given mock base URL.
    pub fn test_default(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            identity_token_url: format!("{}/token", base_url),
            api_base_url: base_url.to_string(),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            token_store_path: PathBuf::from(DEFAULT_TOKEN_STORE_PATH),
            token_store_secret: None,
            http_timeout: Duration::from_secs(5),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    reason: format!("expected a whole number of seconds, got {:?}", raw),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            identity_token_url: required("IDENTITY_TOKEN_URL")?,
            api_base_url: required("API_BASE_URL")?.trim_end_matches('/').to_string(),
            client_id: required("OIDC_CLIENT_ID")?,
            client_secret: required("OIDC_CLIENT_SECRET")?,
            scope: env::var("OIDC_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string()),
            token_store_path: env::var("TOKEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_STORE_PATH)),
            token_store_secret: env::var("TOKEN_STORE_SECRET")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            http_timeout,
        })
    }
}

/// Read a required, non-empty variable.
fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
