// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Services module - sync and import logic.

pub mod coordinator;
pub mod coordinator_client;
pub mod health_import;
pub mod sync;

pub use coordinator::build_coordinator_context;
pub use coordinator_client::CoordinatorClient;
pub use health_import::{import_run, RunSamples, RunningDraft};
pub use sync::{ChatOutcome, SyncPhase, SyncService, WorkoutOutcome};
