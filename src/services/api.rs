// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Setoran REST API client.
//!
//! Stateless: every call takes the access token to use. Token lifecycle
//! lives in [`crate::services::SessionClient`].

use std::fmt;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Result, SessionError};
use crate::models::SetoranRequest;

/// One backend operation: method, path and body.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// `GET /dosen`
    Advisor,
    /// `GET /mahasiswa/{nim}/setoran`
    Submissions { nim: String },
    /// `POST /mahasiswa/{nim}/setoran`
    AddSubmission { nim: String, body: SetoranRequest },
    /// `DELETE /mahasiswa/{nim}/setoran/{id}`
    DeleteSubmission {
        nim: String,
        id: String,
        body: SetoranRequest,
    },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Advisor | Endpoint::Submissions { .. } => Method::GET,
            Endpoint::AddSubmission { .. } => Method::POST,
            Endpoint::DeleteSubmission { .. } => Method::DELETE,
        }
    }

    /// Path relative to the API base URL, with segments percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Advisor => "/dosen".to_string(),
            Endpoint::Submissions { nim } | Endpoint::AddSubmission { nim, .. } => {
                format!("/mahasiswa/{}/setoran", urlencoding::encode(nim))
            }
            Endpoint::DeleteSubmission { nim, id, .. } => format!(
                "/mahasiswa/{}/setoran/{}",
                urlencoding::encode(nim),
                urlencoding::encode(id)
            ),
        }
    }

    pub fn body(&self) -> Option<&SetoranRequest> {
        match self {
            Endpoint::AddSubmission { body, .. } | Endpoint::DeleteSubmission { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// Error body shape used by the backend.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Setoran API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Issue `endpoint` with a bearer token and decode the JSON reply.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        access_token: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint.path());

        let mut request = self
            .http
            .request(endpoint.method(), &url)
            .bearer_auth(access_token);
        if let Some(body) = endpoint.body() {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.check_response_json(endpoint, response).await
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });

            if status.as_u16() != 401 {
                tracing::warn!(endpoint = %endpoint, status = status.as_u16(), message = %message, "API request failed");
            }
            return Err(SessionError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        // Mutations may acknowledge with an empty body.
        let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(bytes)
            .map_err(|e| SessionError::InvalidResponse(format!("{}: {}", endpoint, e)))
    }
}
