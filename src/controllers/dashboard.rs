// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Advisor dashboard: profile plus the list of advised students.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::drive;
use crate::error::Result;
use crate::models::DosenResponse;
use crate::services::SessionClient;
use crate::state::StateStream;

#[derive(Clone)]
pub struct DashboardController {
    session: SessionClient,
    advisor: Arc<StateStream<DosenResponse>>,
}

impl DashboardController {
    pub fn new(session: SessionClient) -> Self {
        Self {
            session,
            advisor: Arc::new(StateStream::new()),
        }
    }

    pub fn advisor(&self) -> &StateStream<DosenResponse> {
        &self.advisor
    }

    /// Fetch advisor info in the background.
    pub fn fetch_advisor(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            this.load_advisor().await;
        })
    }

    /// Fetch advisor info on the current task.
    pub async fn load_advisor(&self) -> bool {
        drive(
            &self.session,
            &self.advisor,
            "fetch_advisor",
            self.session.advisor(),
        )
        .await
    }

    /// Clear tokens and drop whatever the dashboard was showing.
    pub fn logout(&self) -> Result<()> {
        self.session.logout()?;
        self.advisor.reset();
        Ok(())
    }
}
