// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Default timeout for chat requests; the coordinator may be waiting on a
/// slow generation pipeline.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 300;
/// Default timeout for workout submissions.
pub const DEFAULT_WORKOUT_TIMEOUT_SECS: u64 = 75;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Coordinator base URL, e.g. `http://localhost:8000`
    pub api_url: String,
    /// Identity sent with every request
    pub user_id: Uuid,
    /// Conversation identifier sent with chat requests
    pub conversation_id: String,
    /// Location of the SQLite store file
    pub store_path: PathBuf,
    /// Timeout for `/chat`
    pub chat_timeout: Duration,
    /// Timeout for `/submit_workout`
    pub workout_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("COACH_API_URL").map_err(|_| ConfigError::Missing("COACH_API_URL"))?;

        let user_id = env::var("COACH_USER_ID")
            .map_err(|_| ConfigError::Missing("COACH_USER_ID"))?
            .trim()
            .parse::<Uuid>()
            .map_err(|e| ConfigError::Invalid("COACH_USER_ID", e.to_string()))?;

        Ok(Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            user_id,
            conversation_id: env::var("COACH_CONVERSATION_ID")
                .unwrap_or_else(|_| "conv_default".to_string()),
            store_path: env::var("COACH_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("dojo-coach.db")),
            chat_timeout: timeout_from_env("COACH_CHAT_TIMEOUT_SECS", DEFAULT_CHAT_TIMEOUT_SECS)?,
            workout_timeout: timeout_from_env(
                "COACH_WORKOUT_TIMEOUT_SECS",
                DEFAULT_WORKOUT_TIMEOUT_SECS,
            )?,
        })
    }

    /// Config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            user_id: Uuid::from_u128(0x204f_c006_cc86_403a_9b7f_60cd_27e4_43ad),
            conversation_id: "conv_test".to_string(),
            store_path: PathBuf::from("dojo-coach.test.db"),
            chat_timeout: Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS),
            workout_timeout: Duration::from_secs(DEFAULT_WORKOUT_TIMEOUT_SECS),
        }
    }
}

fn timeout_from_env(name: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::Invalid(name, format!("expected positive seconds, got {raw:?}"))),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
