// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the identity provider and the setoran API.
//!
//! The mock accepts exactly one access token at a time and one refresh
//! token, mirroring how the real identity provider rotates both on refresh.
//! Every handler bumps a counter so tests can assert how often each
//! endpoint was hit.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use setoran_dosen::config::Config;
use setoran_dosen::models::Tokens;
use setoran_dosen::services::SessionClient;
use setoran_dosen::store::{MemoryTokenStore, TokenStore};

pub const USERNAME: &str = "dosen";
pub const PASSWORD: &str = "rahasia";
pub const NIM: &str = "12150110001";

/// Mutable behaviour and counters of the mock.
#[derive(Default)]
pub struct MockState {
    /// Access token the API currently accepts
    pub valid_access: Mutex<String>,
    /// Refresh token the identity provider currently accepts
    pub valid_refresh: Mutex<String>,
    /// Token generation; login issues 1, each refresh the next
    pub generation: AtomicUsize,
    /// Make every refresh fail with invalid_grant
    pub refresh_fails: AtomicBool,
    /// Make the API answer 401 regardless of token
    pub reject_all: AtomicBool,
    /// Status returned by add/delete instead of success
    pub mutation_status: Mutex<Option<u16>>,
    /// Delay before a refresh grant is checked, in milliseconds
    pub refresh_delay_ms: AtomicU64,
    /// Per-NIM delay of the submission fetch, in milliseconds
    pub setoran_delay_ms: Mutex<HashMap<String, u64>>,

    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub dosen_calls: AtomicUsize,
    pub setoran_fetches: AtomicUsize,
    pub setoran_posts: AtomicUsize,
    pub setoran_deletes: AtomicUsize,
    /// Bearer tokens seen by the API, in order
    pub bearer_tokens: Mutex<Vec<String>>,
    /// Last add/delete: (path, JSON body)
    pub last_mutation: Mutex<Option<(String, Value)>>,
}

impl MockState {
    /// Pretend a login already happened and issued generation `n`.
    pub fn issue(&self, n: usize) -> Tokens {
        self.generation.store(n, Ordering::SeqCst);
        let tokens = Tokens::new(format!("a{}", n), format!("r{}", n), format!("i{}", n));
        *self.valid_access.lock().unwrap() = tokens.access_token.clone();
        *self.valid_refresh.lock().unwrap() = tokens.refresh_token.clone();
        tokens
    }

    /// Invalidate the current access token; the refresh token stays valid.
    pub fn expire_access(&self) {
        *self.valid_access.lock().unwrap() = "expired".to_string();
    }

    /// Hold fetches of `nim`'s submissions for `ms` before answering.
    pub fn slow_setoran(&self, nim: &str, ms: u64) {
        self.setoran_delay_ms
            .lock()
            .unwrap()
            .insert(nim.to_string(), ms);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/token", post(token))
            .route("/dosen", get(dosen))
            .route("/mahasiswa/{nim}/setoran", get(get_setoran).post(post_setoran))
            .route("/mahasiswa/{nim}/setoran/{id}", delete(delete_setoran))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("No local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn config(&self) -> Config {
        Config::test_default(&self.base_url)
    }

    /// Session client over a fresh in-memory store.
    pub fn session(&self, store: Arc<dyn TokenStore>) -> SessionClient {
        SessionClient::new(&self.config(), store).expect("Failed to build session client")
    }
}

/// In-memory store, optionally pre-seeded.
pub fn memory_store(tokens: Option<Tokens>) -> Arc<dyn TokenStore> {
    match tokens {
        Some(t) => Arc::new(MemoryTokenStore::with_tokens(t)),
        None => Arc::new(MemoryTokenStore::new()),
    }
}

// ─── Identity provider ───────────────────────────────────────────────────────

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let field = |k: &str| form.get(k).map(String::as_str).unwrap_or_default();

    if field("client_id") != "test-client" || field("client_secret") != "test-secret" {
        return oauth_error(StatusCode::UNAUTHORIZED, "invalid_client");
    }

    match field("grant_type") {
        "password" => {
            state.login_calls.fetch_add(1, Ordering::SeqCst);
            if field("username") != USERNAME || field("password") != PASSWORD {
                return oauth_error(StatusCode::UNAUTHORIZED, "invalid_grant");
            }
            if field("scope") != "openid profile email" {
                return oauth_error(StatusCode::BAD_REQUEST, "invalid_scope");
            }
            token_response(&state.issue(1))
        }
        "refresh_token" => {
            state.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            let current = state.valid_refresh.lock().unwrap().clone();
            if state.refresh_fails.load(Ordering::SeqCst) || field("refresh_token") != current {
                return oauth_error(StatusCode::BAD_REQUEST, "invalid_grant");
            }
            let next = state.generation.load(Ordering::SeqCst) + 1;
            token_response(&state.issue(next))
        }
        _ => oauth_error(StatusCode::BAD_REQUEST, "unsupported_grant_type"),
    }
}

fn token_response(tokens: &Tokens) -> Response {
    Json(json!({
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
        "id_token": tokens.id_token,
        "expires_in": 300,
        "token_type": "Bearer"
    }))
    .into_response()
}

fn oauth_error(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(json!({"error": error, "error_description": "rejected by mock"})),
    )
        .into_response()
}

// ─── Setoran API ─────────────────────────────────────────────────────────────

/// Check the bearer token; `Err` carries the 401 response.
fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    state.bearer_tokens.lock().unwrap().push(bearer.clone());

    let valid = state.valid_access.lock().unwrap().clone();
    if state.reject_all.load(Ordering::SeqCst) || bearer != valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"response": false, "message": "Token tidak valid"})),
        )
            .into_response());
    }
    Ok(())
}

async fn dosen(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.dosen_calls.fetch_add(1, Ordering::SeqCst);
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    Json(dosen_fixture()).into_response()
}

async fn get_setoran(
    State(state): State<Arc<MockState>>,
    Path(nim): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.setoran_fetches.fetch_add(1, Ordering::SeqCst);
    let delay = state.setoran_delay_ms.lock().unwrap().get(&nim).copied();
    if let Some(ms) = delay {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    if nim != NIM {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"response": false, "message": "Mahasiswa tidak ditemukan"})),
        )
            .into_response();
    }
    Json(setoran_fixture()).into_response()
}

async fn post_setoran(
    State(state): State<Arc<MockState>>,
    Path(nim): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.setoran_posts.fetch_add(1, Ordering::SeqCst);
    mutation(&state, &headers, format!("/mahasiswa/{}/setoran", nim), body)
}

async fn delete_setoran(
    State(state): State<Arc<MockState>>,
    Path((nim, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.setoran_deletes.fetch_add(1, Ordering::SeqCst);
    mutation(
        &state,
        &headers,
        format!("/mahasiswa/{}/setoran/{}", nim, id),
        body,
    )
}

fn mutation(state: &MockState, headers: &HeaderMap, path: String, body: Bytes) -> Response {
    if let Err(resp) = authorize(state, headers) {
        return resp;
    }
    let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    *state.last_mutation.lock().unwrap() = Some((path, value));

    if let Some(code) = *state.mutation_status.lock().unwrap() {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (
            status,
            Json(json!({"response": false, "message": "Komponen sudah disetor"})),
        )
            .into_response();
    }
    Json(json!({"response": true, "message": "Berhasil"})).into_response()
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn dosen_fixture() -> Value {
    json!({
        "response": true,
        "message": "Berhasil mengambil data dosen",
        "data": {
            "nama": "Dr. Siti Aminah",
            "nip": "198001012005012001",
            "email": "siti@example.ac.id",
            "info_mahasiswa_pa": {
                "daftar_mahasiswa": [
                    {"nim": NIM, "nama": "Ahmad Fauzi", "angkatan": "2021",
                     "info_setoran": {"persentase_progres_setor": 33.33}},
                    {"nim": "12150110002", "nama": "Budi Santoso", "angkatan": "2022",
                     "info_setoran": {"persentase_progres_setor": 0}}
                ]
            }
        }
    })
}

pub fn setoran_fixture() -> Value {
    json!({
        "response": true,
        "message": "Berhasil",
        "data": {
            "info": {
                "nama": "Ahmad Fauzi", "nim": NIM, "email": "ahmad@example.ac.id",
                "angkatan": "2021", "semester": 6,
                "dosen_pa": {"nama": "Dr. Siti Aminah", "nip": "198001012005012001",
                             "email": "siti@example.ac.id"}
            },
            "setoran": {
                "info_dasar": {
                    "total_wajib_setor": 3, "total_sudah_setor": 1, "total_belum_setor": 2,
                    "persentase_progres_setor": 33.33,
                    "tgl_terakhir_setor": "2025-05-01T08:00:00Z",
                    "terakhir_setor": "2 minggu yang lalu"
                },
                "ringkasan": [
                    {"label": "KP", "total_wajib_setor": 3, "total_sudah_setor": 1,
                     "total_belum_setor": 2, "persentase_progres_setor": 33.33}
                ],
                "detail": [
                    {"id": "k-1", "nama": "An-Naba", "label": "KP", "sudah_setor": true,
                     "info_setoran": {"id": "s-1", "tgl_setoran": "2025-05-01",
                                      "tgl_validasi": "2025-05-01",
                                      "dosen_yang_mengesahkan": {"nama": "Dr. Siti Aminah"}}},
                    {"id": "k-2", "nama": "An-Nazi'at", "label": "KP", "sudah_setor": false,
                     "info_setoran": null},
                    {"id": "k-3", "nama": "'Abasa", "label": "KP", "sudah_setor": false,
                     "info_setoran": null}
                ]
            }
        }
    })
}
