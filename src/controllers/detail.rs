// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only submission detail for one student.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::drive;
use crate::models::SetoranMahasiswaResponse;
use crate::services::SessionClient;
use crate::state::StateStream;

#[derive(Clone)]
pub struct SubmissionDetailController {
    session: SessionClient,
    nim: Arc<str>,
    submissions: Arc<StateStream<SetoranMahasiswaResponse>>,
}

impl SubmissionDetailController {
    pub fn new(session: SessionClient, nim: impl Into<Arc<str>>) -> Self {
        Self {
            session,
            nim: nim.into(),
            submissions: Arc::new(StateStream::new()),
        }
    }

    pub fn nim(&self) -> &str {
        &self.nim
    }

    pub fn submissions(&self) -> &StateStream<SetoranMahasiswaResponse> {
        &self.submissions
    }

    pub fn fetch(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            this.load().await;
        })
    }

    pub async fn load(&self) -> bool {
        drive(
            &self.session,
            &self.submissions,
            "fetch_submissions",
            self.session.submissions(&self.nim),
        )
        .await
    }
}
