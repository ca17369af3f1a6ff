// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Error types for sync, mapping and local persistence.
//!
//! The sync taxonomy keeps "could not reach the coordinator" apart from
//! "the coordinator answered with something we cannot use", and both apart
//! from local save failures, so callers can present each one differently.

use crate::models::grade::GradeParseError;

/// Failures of a sync attempt. None of them trigger an automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Local payload could not be serialized; nothing was sent.
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Connectivity problem or timeout.
    #[error("Coordinator unreachable: {0}")]
    Network(String),

    /// The coordinator answered with a non-success status.
    #[error("Coordinator returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode coordinator response: {0}")]
    Decode(String),

    /// The response decoded but could not be mapped into local models.
    #[error("Coordinator response contained invalid data: {0}")]
    Mapping(#[from] MappingError),

    /// The local save failed after a successful exchange.
    #[error("Failed to save synced state: {0}")]
    Persistence(#[from] StoreError),

    /// A request is already in flight.
    #[error("A sync request is already in progress")]
    SendInProgress,

    /// `retry_persist` was called with nothing pending.
    #[error("No pending synced state to save")]
    NothingPending,
}

impl SyncError {
    /// True when the coordinator could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, SyncError::Network(_))
    }

    /// True when the coordinator answered but the answer was unusable.
    pub fn is_server_response(&self) -> bool {
        matches!(
            self,
            SyncError::Server { .. } | SyncError::Decode(_) | SyncError::Mapping(_)
        )
    }

    /// True when only the local save failed and `retry_persist` can be offered.
    pub fn is_retryable_save(&self) -> bool {
        matches!(self, SyncError::Persistence(_))
    }
}

/// Failures converting wire DTOs into local models.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("Invalid grade: {0}")]
    Grade(#[from] GradeParseError),
}

/// Local store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store I/O error: {0}")]
    Io(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// A stored value could not be encoded.
    #[error("Failed to encode stored value: {0}")]
    Encode(String),

    #[error("Store data is corrupt: {0}")]
    Corrupt(String),

    #[error("Unsupported store schema version {found} (expected {expected})")]
    SchemaVersion { found: i32, expected: i32 },

    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(rusqlite::ErrorCode::NotADatabase) => StoreError::Corrupt(e.to_string()),
            _ => StoreError::Sqlite(e),
        }
    }
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
