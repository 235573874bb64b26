// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-stream request state observed by the presentation layer.
//!
//! A [`StateStream`] holds the latest [`RequestState`] for one logical data
//! stream. Writers are the owning controller's tasks; readers either poll
//! [`StateStream::current`] or hold a `watch::Receiver` from
//! [`StateStream::subscribe`]. Whichever task writes last wins.

use tokio::sync::watch;

use crate::error::SessionError;

/// Lifecycle of one fetch or mutation stream.
#[derive(Debug, Clone)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Error(SessionError),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SessionError> {
        match self {
            RequestState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// User-facing error text, if in the error state.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// Whether this is a terminal outcome of the last request.
    pub fn is_settled(&self) -> bool {
        matches!(self, RequestState::Success(_) | RequestState::Error(_))
    }
}

impl<T> From<crate::error::Result<T>> for RequestState<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(data) => RequestState::Success(data),
            Err(err) => RequestState::Error(err),
        }
    }
}

/// Observable holder of the latest state for one stream.
#[derive(Debug)]
pub struct StateStream<T> {
    tx: watch::Sender<RequestState<T>>,
}

impl<T> Default for StateStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StateStream<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RequestState::Idle);
        Self { tx }
    }

    /// New receiver; sees the current value plus every later change.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.tx.subscribe()
    }

    pub fn set(&self, state: RequestState<T>) {
        // send_replace works with zero receivers, unlike send.
        self.tx.send_replace(state);
    }

    pub fn set_loading(&self) {
        self.set(RequestState::Loading);
    }

    /// Map an operation result to Success or Error.
    pub fn settle(&self, result: crate::error::Result<T>) {
        self.set(result.into());
    }

    pub fn reset(&self) {
        self.set(RequestState::Idle);
    }
}

impl<T: Clone> StateStream<T> {
    /// Snapshot of the current state.
    pub fn current(&self) -> RequestState<T> {
        self.tx.borrow().clone()
    }
}
