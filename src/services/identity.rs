// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (OIDC token endpoint).
//!
//! Handles:
//! - Password grant login
//! - Refresh token grant

use crate::config::Config;
use crate::error::{Result, SessionError};
use crate::models::auth::{Credentials, OAuthErrorBody, TokenResponse, Tokens};

/// OAuth2 token endpoint client with fixed client credentials.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            token_url: config.identity_token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        }
    }

    /// Exchange username and password for tokens.
    pub async fn login(&self, credentials: &Credentials) -> Result<Tokens> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SessionError::Auth(format!("Token request failed: {}", e)))?;

        let tokens = self.read_tokens(response).await?;
        tracing::info!(username = %credentials.username, "Login succeeded");
        Ok(tokens)
    }

    /// Trade a refresh token for a new token triple.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Tokens> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| SessionError::Auth(format!("Token request failed: {}", e)))?;

        self.read_tokens(response).await
    }

    async fn read_tokens(&self, response: reqwest::Response) -> Result<Tokens> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<OAuthErrorBody>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {}", err.error, desc),
                    None => err.error,
                },
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            tracing::warn!(status = status.as_u16(), error = %detail, "Token endpoint rejected request");
            return Err(SessionError::Auth(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        response
            .json::<TokenResponse>()
            .await
            .map(TokenResponse::into_tokens)
            .map_err(|e| SessionError::Auth(format!("Failed to parse token response: {}", e)))
    }
}
