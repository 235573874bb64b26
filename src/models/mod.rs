// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wire models for the identity provider and the setoran API.

pub mod auth;
pub mod dosen;
pub mod setoran;

pub use auth::{Credentials, TokenResponse, Tokens};
pub use dosen::{Dosen, DosenResponse, Mahasiswa};
pub use setoran::{
    DetailSetoran, MutationResponse, SetoranItem, SetoranMahasiswa, SetoranMahasiswaResponse,
    SetoranRequest,
};
