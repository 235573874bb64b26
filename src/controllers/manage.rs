// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Submission management: pick a student, add or delete submissions.
//!
//! Mutations report through the submissions stream. A successful mutation
//! is not kept as its own state; it immediately re-fetches the student's
//! submissions, and that fetch's outcome is what the stream ends on.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{drive, publish};
use crate::error::Result;
use crate::models::{DosenResponse, MutationResponse, SetoranItem, SetoranMahasiswaResponse};
use crate::services::SessionClient;
use crate::state::StateStream;

#[derive(Clone)]
pub struct SubmissionController {
    session: SessionClient,
    advisor: Arc<StateStream<DosenResponse>>,
    submissions: Arc<StateStream<SetoranMahasiswaResponse>>,
}

impl SubmissionController {
    pub fn new(session: SessionClient) -> Self {
        Self {
            session,
            advisor: Arc::new(StateStream::new()),
            submissions: Arc::new(StateStream::new()),
        }
    }

    /// Advisor info, used to populate the student picker.
    pub fn advisor(&self) -> &StateStream<DosenResponse> {
        &self.advisor
    }

    pub fn submissions(&self) -> &StateStream<SetoranMahasiswaResponse> {
        &self.submissions
    }

    // ─── Background operations ───────────────────────────────────────────────

    pub fn fetch_advisor(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            this.load_advisor().await;
        })
    }

    pub fn fetch_submissions(&self, nim: impl Into<String>) -> JoinHandle<()> {
        let this = self.clone();
        let nim = nim.into();
        tokio::spawn(async move {
            this.load_submissions(&nim).await;
        })
    }

    pub fn add_submission(
        &self,
        nim: impl Into<String>,
        component_id: impl Into<String>,
        component_name: impl Into<String>,
    ) -> JoinHandle<()> {
        let this = self.clone();
        let nim = nim.into();
        let item = SetoranItem::add(component_id, component_name);
        tokio::spawn(async move {
            this.submit(&nim, &item).await;
        })
    }

    pub fn delete_submission(
        &self,
        nim: impl Into<String>,
        submission_id: impl Into<String>,
        component_id: impl Into<String>,
        component_name: impl Into<String>,
    ) -> JoinHandle<()> {
        let this = self.clone();
        let nim = nim.into();
        let item = SetoranItem::delete(submission_id, component_id, component_name);
        tokio::spawn(async move {
            this.submit(&nim, &item).await;
        })
    }

    // ─── Same operations on the current task ─────────────────────────────────

    pub async fn load_advisor(&self) -> bool {
        drive(
            &self.session,
            &self.advisor,
            "fetch_advisor",
            self.session.advisor(),
        )
        .await
    }

    pub async fn load_submissions(&self, nim: &str) -> bool {
        drive(
            &self.session,
            &self.submissions,
            "fetch_submissions",
            self.session.submissions(nim),
        )
        .await
    }

    /// Add (`item.id` unset) or delete (`item.id` set) one submission, then
    /// re-fetch on success. Returns whether the mutation itself succeeded.
    pub async fn submit(&self, nim: &str, item: &SetoranItem) -> bool {
        self.submissions.set_loading();

        let result = self.mutate(nim, item).await;
        match result {
            Ok(ack) => {
                tracing::info!(
                    nim = %nim,
                    component_id = %item.id_komponen_setoran,
                    ack = %ack.message,
                    "Submission updated, refreshing"
                );
                self.load_submissions(nim).await;
                true
            }
            Err(e) => publish(&self.session, &self.submissions, "update_submission", Err(e)),
        }
    }

    async fn mutate(&self, nim: &str, item: &SetoranItem) -> Result<MutationResponse> {
        match &item.id {
            Some(submission_id) => {
                self.session
                    .delete_submission(
                        nim,
                        submission_id,
                        &item.id_komponen_setoran,
                        &item.nama_komponen_setoran,
                    )
                    .await
            }
            None => {
                self.session
                    .add_submission(nim, &item.id_komponen_setoran, &item.nama_komponen_setoran)
                    .await
            }
        }
    }
}
