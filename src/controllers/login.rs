// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in flow.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::drive;
use crate::error::SessionError;
use crate::services::SessionClient;
use crate::state::StateStream;

/// Login screen controller; Success carries the signed-in username.
#[derive(Clone)]
pub struct LoginController {
    session: SessionClient,
    status: Arc<StateStream<String>>,
}

impl LoginController {
    pub fn new(session: SessionClient) -> Self {
        Self {
            session,
            status: Arc::new(StateStream::new()),
        }
    }

    pub fn status(&self) -> &StateStream<String> {
        &self.status
    }

    /// Sign in and persist tokens, in the background.
    pub fn login(&self, username: impl Into<String>, password: impl Into<String>) -> JoinHandle<()> {
        let this = self.clone();
        let username = username.into();
        let password = password.into();
        tokio::spawn(async move {
            this.sign_in(&username, &password).await;
        })
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> bool {
        let session = self.session.clone();
        drive(&self.session, &self.status, "login", async move {
            session.sign_in(username, password).await?;
            Ok::<_, SessionError>(username.to_string())
        })
        .await
    }
}
