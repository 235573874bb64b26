// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session over the setoran API.
//!
//! Every backend call goes through [`SessionClient::execute`], which:
//! 1. Reads the access token from the store (`NoToken` if absent)
//! 2. Issues the call
//! 3. On HTTP 401, refreshes once with the stored refresh token, saves the
//!    new tokens and replays the original call with the new access token
//!
//! A 401 on the replay is returned as a plain API error. There is never
//! more than one refresh per operation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::config::Config;
use crate::error::{RejectedToken, Result, SessionError};
use crate::models::{
    Credentials, DosenResponse, MutationResponse, SetoranItem, SetoranMahasiswaResponse,
    SetoranRequest, Tokens,
};
use crate::services::api::{ApiClient, Endpoint};
use crate::services::identity::IdentityClient;
use crate::store::TokenStore;

/// High-level client that owns token handling for all backend calls.
#[derive(Clone)]
pub struct SessionClient {
    api: ApiClient,
    identity: IdentityClient,
    store: Arc<dyn TokenStore>,
}

impl SessionClient {
    /// Build the HTTP client and both service clients from config.
    pub fn new(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| SessionError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api: ApiClient::new(http.clone(), config.api_base_url.clone()),
            identity: IdentityClient::new(http, config),
            store,
        })
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    // ─── Identity ────────────────────────────────────────────────────────────

    /// Password-grant login. Does not touch the store.
    pub async fn login(&self, username: &str, password: &str) -> Result<Tokens> {
        let credentials = Credentials::new(username, password);
        credentials.validate()?;
        self.identity.login(&credentials).await
    }

    /// Refresh-token grant. Does not touch the store.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Tokens> {
        self.identity.refresh(refresh_token).await
    }

    /// Login and persist the resulting tokens.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Tokens> {
        let tokens = self.login(username, password).await?;
        self.store.save(&tokens)?;
        Ok(tokens)
    }

    /// Forget all stored tokens.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("Signed out, tokens cleared");
        Ok(())
    }

    /// Drop the stored tokens if they still carry `rejected`.
    ///
    /// Another operation may have refreshed successfully since `rejected`
    /// was read; its tokens are kept. Returns whether the store was cleared.
    pub fn discard_rejected(&self, rejected: &RejectedToken) -> Result<bool> {
        let cleared = self.store.clear_if_refresh_token(rejected.as_str())?;
        if cleared {
            tracing::info!("Refresh token rejected, tokens cleared");
        }
        Ok(cleared)
    }

    // ─── Generic call path ───────────────────────────────────────────────────

    /// Single authenticated call with an explicit token; no refresh.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        access_token: &str,
    ) -> Result<T> {
        self.api.call(endpoint, access_token).await
    }

    /// Authenticated call with at most one refresh-and-retry on 401.
    pub async fn execute<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let access_token = self.store.access_token().ok_or(SessionError::NoToken)?;

        match self.api.call(endpoint, &access_token).await {
            Err(e) if e.is_unauthorized() => {}
            other => return other,
        }

        tracing::info!(endpoint = %endpoint, "Access token rejected, refreshing");

        let refresh_token = self
            .store
            .refresh_token()
            .ok_or(SessionError::SessionExpired)?;

        let tokens = self.identity.refresh(&refresh_token).await.map_err(|e| {
            tracing::warn!(error = %e, "Token refresh failed");
            let message = match e {
                SessionError::Auth(detail) => detail,
                other => other.to_string(),
            };
            SessionError::RefreshFailed {
                message,
                rejected: RejectedToken::new(refresh_token.clone()),
            }
        })?;

        self.store.save(&tokens)?;
        tracing::info!(endpoint = %endpoint, "Token refreshed, retrying request");

        self.api.call(endpoint, &tokens.access_token).await
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Signed-in advisor with advised students.
    pub async fn advisor(&self) -> Result<DosenResponse> {
        self.execute(&Endpoint::Advisor).await
    }

    /// Submission detail for one student.
    pub async fn submissions(&self, nim: &str) -> Result<SetoranMahasiswaResponse> {
        require_nim(nim)?;
        self.execute(&Endpoint::Submissions {
            nim: nim.to_string(),
        })
        .await
    }

    /// Record a submission of one component.
    pub async fn add_submission(
        &self,
        nim: &str,
        component_id: &str,
        component_name: &str,
    ) -> Result<MutationResponse> {
        require_nim(nim)?;
        let body = SetoranRequest::single(SetoranItem::add(component_id, component_name));
        body.validate()?;

        tracing::debug!(nim = %nim, component_id = %component_id, "Adding submission");
        self.execute(&Endpoint::AddSubmission {
            nim: nim.to_string(),
            body,
        })
        .await
    }

    /// Remove a previously validated submission.
    pub async fn delete_submission(
        &self,
        nim: &str,
        submission_id: &str,
        component_id: &str,
        component_name: &str,
    ) -> Result<MutationResponse> {
        require_nim(nim)?;
        let body = SetoranRequest::single(SetoranItem::delete(
            submission_id,
            component_id,
            component_name,
        ));
        body.validate()?;

        tracing::debug!(nim = %nim, submission_id = %submission_id, "Deleting submission");
        self.execute(&Endpoint::DeleteSubmission {
            nim: nim.to_string(),
            id: submission_id.to_string(),
            body,
        })
        .await
    }
}

fn require_nim(nim: &str) -> Result<()> {
    if nim.trim().is_empty() {
        return Err(SessionError::InvalidInput("NIM must not be empty".to_string()));
    }
    Ok(())
}
