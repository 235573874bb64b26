// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-screen controllers.
//!
//! Each controller owns one or two [`StateStream`]s and exposes imperative
//! operations. Operations are spawned as independent tokio tasks and return
//! their `JoinHandle`; dropping the handle does not cancel the task. Calls
//! are neither deduplicated nor cancelled, so the last task to finish
//! decides what a stream shows.

pub mod dashboard;
pub mod detail;
pub mod login;
pub mod manage;

pub use dashboard::DashboardController;
pub use detail::SubmissionDetailController;
pub use login::LoginController;
pub use manage::SubmissionController;

use std::future::Future;

use crate::error::Result;
use crate::services::SessionClient;
use crate::state::StateStream;

/// Run one operation against a stream: Loading, then Success or Error.
pub(crate) async fn drive<T, F>(
    session: &SessionClient,
    stream: &StateStream<T>,
    operation: &'static str,
    fut: F,
) -> bool
where
    F: Future<Output = Result<T>>,
{
    stream.set_loading();
    let result = fut.await;
    publish(session, stream, operation, result)
}

/// Settle a stream with an operation's result.
///
/// A failed refresh means the tokens it used are dead, so they are cleared
/// before the error is published, unless another operation has already
/// replaced them. Returns whether the result was a success.
pub(crate) fn publish<T>(
    session: &SessionClient,
    stream: &StateStream<T>,
    operation: &'static str,
    result: Result<T>,
) -> bool {
    if let Err(e) = &result {
        tracing::warn!(operation, error = %e, "Operation failed");
        if let Some(rejected) = e.rejected_refresh_token() {
            match session.discard_rejected(rejected) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!(operation, "Tokens were rotated meanwhile, keeping them")
                }
                Err(clear_err) => {
                    tracing::error!(error = %clear_err, "Failed to clear tokens after refresh failure")
                }
            }
        }
    }

    let ok = result.is_ok();
    stream.settle(result);
    ok
}
