// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

use dojo_coach::error::{MappingError, StoreError, SyncError};
use dojo_coach::models::GradeValue;

#[test]
fn test_mapping_error_converts_to_server_response_class() {
    let grade_err = "V18".parse::<GradeValue>().unwrap_err();
    let err: SyncError = MappingError::from(grade_err).into();

    assert!(err.is_server_response());
    assert!(!err.is_network());
    assert!(!err.is_retryable_save());
    assert!(err.to_string().contains("V18"));
}

#[test]
fn test_store_error_converts_to_retryable_save() {
    let err: SyncError = StoreError::Io("disk full".to_string()).into();

    assert!(err.is_retryable_save());
    assert!(!err.is_server_response());
    assert_eq!(err.to_string(), "Failed to save synced state: Store I/O error: disk full");
}

#[test]
fn test_guard_errors_are_not_classified() {
    for err in [SyncError::SendInProgress, SyncError::NothingPending] {
        assert!(!err.is_network());
        assert!(!err.is_server_response());
        assert!(!err.is_retryable_save());
    }
}

#[test]
fn test_encode_error_is_not_network() {
    let err = SyncError::Encode("float is NaN".to_string());
    assert!(!err.is_network());
    assert!(!err.is_server_response());
}

#[test]
fn test_schema_version_message() {
    let err = StoreError::SchemaVersion {
        found: 3,
        expected: 1,
    };
    assert_eq!(err.to_string(), "Unsupported store schema version 3 (expected 1)");
}
