// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! HTTP client for the remote coordinator.
//!
//! Two endpoints, both JSON over POST:
//! - `/chat`: send the transcript plus context, get a new transcript and context
//! - `/submit_workout`: upload a completed workout, get a new context
//!
//! Failures are classified but never retried here.

use crate::config::Config;
use crate::dto::{ChatPayload, ChatResponse, WorkoutPayload, WorkoutResponse};
use crate::error::{Result, SyncError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Longest response body excerpt kept in a `Server` error.
const MAX_ERROR_BODY: usize = 2_048;

/// Coordinator API client.
#[derive(Clone)]
pub struct CoordinatorClient {
    http: reqwest::Client,
    base_url: String,
    chat_timeout: Duration,
    workout_timeout: Duration,
}

impl CoordinatorClient {
    /// Create a client for the coordinator at `config.api_url`.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            chat_timeout: config.chat_timeout,
            workout_timeout: config.workout_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /chat
    pub async fn chat(&self, payload: &ChatPayload) -> Result<ChatResponse> {
        self.post_json("chat", payload, self.chat_timeout).await
    }

    /// POST /submit_workout
    pub async fn submit_workout(&self, payload: &WorkoutPayload) -> Result<WorkoutResponse> {
        self.post_json("submit_workout", payload, self.workout_timeout)
            .await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T> {
        // Encode up front so an unserializable payload never reaches the wire.
        let bytes = serde_json::to_vec(body).map_err(|e| SyncError::Encode(e.to_string()))?;
        let url = format!("{}/{}", self.base_url, endpoint);
        let started = Instant::now();

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint, error = %e, "Coordinator request failed");
                SyncError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Network(format!("Failed to read response: {}", e)))?;

        tracing::info!(
            endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Coordinator responded"
        );

        check_response_json(status, &body)
    }
}

/// Check status and decode the body.
fn check_response_json<T: DeserializeOwned>(status: reqwest::StatusCode, body: &[u8]) -> Result<T> {
    if !status.is_success() {
        let mut text = String::from_utf8_lossy(body).into_owned();
        if text.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
        }
        return Err(SyncError::Server {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_slice(body).map_err(|e| SyncError::Decode(e.to_string()))
}
