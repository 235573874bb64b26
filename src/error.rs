// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by the session client, token store and controllers.

use std::fmt;

use crate::store::StoreError;

/// Refresh token the identity provider turned down.
///
/// Kept so the caller can tell whether the store still holds it; `Debug`
/// never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct RejectedToken(String);

impl RejectedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RejectedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RejectedToken(..)")
    }
}

/// Everything that can end a session-backed operation.
///
/// Cloneable so a failure can be parked inside a `RequestState::Error`
/// and handed to every observer of that stream.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("Not authenticated: no access token stored")]
    NoToken,

    #[error("Session expired: no refresh token stored")]
    SessionExpired,

    #[error("Token refresh failed: {message}")]
    RefreshFailed {
        message: String,
        rejected: RejectedToken,
    },

    #[error("Login failed: {0}")]
    Auth(String),

    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Token store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// True for an API response with HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Api { code: 401, .. })
    }

    /// True when the user has to sign in again before anything else works.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            SessionError::NoToken
                | SessionError::SessionExpired
                | SessionError::RefreshFailed { .. }
        )
    }

    /// The refresh token that was turned down, for a refresh failure.
    pub fn rejected_refresh_token(&self) -> Option<&RejectedToken> {
        match self {
            SessionError::RefreshFailed { rejected, .. } => Some(rejected),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Network(err.to_string())
    }
}

impl From<validator::ValidationErrors> for SessionError {
    fn from(err: validator::ValidationErrors) -> Self {
        SessionError::InvalidInput(err.to_string())
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
