// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - network clients and session handling.

pub mod api;
pub mod identity;
pub mod session;

pub use api::{ApiClient, Endpoint};
pub use identity::IdentityClient;
pub use session::SessionClient;
