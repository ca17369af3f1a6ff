// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Sync lifecycle: one outstanding request at a time, wipe-and-replace on
//! success, nothing changed on failure.
//!
//! ```text
//! Idle ──send──▶ Sending ──ok──▶ Applied
//!                   │
//!                   └──err──▶ Failed
//! ```
//!
//! `Applied` and `Failed` both accept the next send. A response that
//! decoded but could not be saved is held as a pending commit until
//! [`SyncService::retry_persist`] or [`SyncService::discard_pending`], or
//! until the next send discards it.
//!
//! The chat transcript lives in the store, keyed by conversation id, and is
//! saved in the same transaction as the synced state.
//!
//! Local edits made while a request is in flight are overwritten when the
//! response is applied (last writer wins).

use crate::config::Config;
use crate::db::{LocalStore, SyncedState};
use crate::dto::{AnyCompletedWorkoutDto, ChatPayload, WorkoutPayload};
use crate::error::{Result, StoreError, SyncError};
use crate::models::{ChatMessage, CompletedWorkout};
use crate::services::coordinator::{build_coordinator_context, wire_user_id};
use crate::services::coordinator_client::CoordinatorClient;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Sending,
    Applied,
    Failed,
}

/// Result of a successful chat exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub server_msg: String,
    /// Transcript after the exchange.
    pub messages: Vec<ChatMessage>,
}

/// Result of a successful workout upload.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutOutcome {
    pub server_msg: String,
    /// The workout as saved to history.
    pub workout: CompletedWorkout,
}

/// Decoded response waiting to be saved.
#[derive(Debug, Clone)]
struct PendingCommit {
    state: SyncedState,
    /// Chat responses also replace the conversation's transcript.
    transcript: Option<Vec<ChatMessage>>,
}

impl PendingCommit {
    fn save(&self, store: &LocalStore, conversation_id: &str) -> std::result::Result<(), StoreError> {
        match &self.transcript {
            Some(messages) => store.commit_chat(&self.state, conversation_id, messages),
            None => store.replace_synced_state(&self.state),
        }
    }
}

/// Clears the in-flight flag when dropped, so every exit path releases it.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| SyncError::SendInProgress)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Recover the guard from a poisoned lock; both values behind these locks
/// are replaced whole, so they are never left half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Drives chat and workout syncs against one store.
pub struct SyncService {
    client: CoordinatorClient,
    store: Arc<LocalStore>,
    user_id: Uuid,
    conversation_id: String,
    in_flight: AtomicBool,
    phase: Mutex<SyncPhase>,
    pending: Mutex<Option<PendingCommit>>,
}

impl SyncService {
    pub fn new(
        client: CoordinatorClient,
        store: Arc<LocalStore>,
        user_id: Uuid,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            user_id,
            conversation_id: conversation_id.into(),
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(SyncPhase::Idle),
            pending: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config, store: Arc<LocalStore>) -> Self {
        Self::new(
            CoordinatorClient::new(config),
            store,
            config.user_id,
            config.conversation_id.clone(),
        )
    }

    pub fn phase(&self) -> SyncPhase {
        *lock(&self.phase)
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }

    /// Saved transcript of this service's conversation.
    pub fn transcript(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.store.transcript(&self.conversation_id)?)
    }

    fn set_phase(&self, phase: SyncPhase) {
        *lock(&self.phase) = phase;
    }

    /// Start a send: discard any pending commit and read the synced state.
    fn begin(&self) -> Result<SyncedState> {
        if lock(&self.pending).take().is_some() {
            tracing::info!("Discarding unsaved sync result before new send");
        }
        self.set_phase(SyncPhase::Sending);
        self.store.synced_state().map_err(|e| {
            self.set_phase(SyncPhase::Failed);
            SyncError::Persistence(e)
        })
    }

    /// Save a decoded response, holding it as pending if the save fails.
    fn commit(&self, commit: PendingCommit) -> Result<()> {
        match commit.save(&self.store, &self.conversation_id) {
            Ok(()) => {
                self.set_phase(SyncPhase::Applied);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save synced state, keeping it pending");
                *lock(&self.pending) = Some(commit);
                self.set_phase(SyncPhase::Failed);
                Err(SyncError::Persistence(e))
            }
        }
    }

    fn fail<T>(&self, err: SyncError) -> Result<T> {
        tracing::warn!(
            error = %err,
            network = err.is_network(),
            server_response = err.is_server_response(),
            "Sync failed"
        );
        self.set_phase(SyncPhase::Failed);
        Err(err)
    }

    /// Send a user message with a fresh context and apply the response.
    ///
    /// The request carries the saved transcript plus the new message. On
    /// any failure the transcript and the store are left as they were.
    pub async fn send_chat(&self, text: &str) -> Result<ChatOutcome> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let local = self.begin()?;

        let mut messages = match self.store.transcript(&self.conversation_id) {
            Ok(messages) => messages,
            Err(e) => return self.fail(e.into()),
        };
        messages.push(ChatMessage::user(text));

        let payload = ChatPayload {
            messages,
            coordinator_context: build_coordinator_context(self.user_id, &local),
            timestamp: Utc::now(),
            user_id: wire_user_id(self.user_id),
            conversation_id: self.conversation_id.clone(),
        };

        tracing::info!(
            conversation_id = %self.conversation_id,
            messages = payload.messages.len(),
            goals = payload.coordinator_context.goals.len(),
            "Sending chat"
        );

        let response = match self.client.chat(&payload).await {
            Ok(response) => response,
            Err(e) => return self.fail(e),
        };
        let state = match SyncedState::try_from(response.context) {
            Ok(state) => state,
            Err(e) => return self.fail(e.into()),
        };

        self.commit(PendingCommit {
            state,
            transcript: Some(response.messages.clone()),
        })?;

        Ok(ChatOutcome {
            server_msg: response.server_msg,
            messages: response.messages,
        })
    }

    /// Save a completed workout to history, then upload it with a fresh
    /// context. On success the returned state replaces goals, plans and
    /// fitness levels.
    ///
    /// The workout is saved before anything is sent, so it stays in history
    /// whatever happens to the upload. If that save fails nothing is sent.
    pub async fn submit_workout(&self, workout: CompletedWorkout) -> Result<WorkoutOutcome> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let local = self.begin()?;

        if let Err(e) = self.store.insert_completed_workout(&workout) {
            return self.fail(e.into());
        }

        let payload = WorkoutPayload {
            user_id: wire_user_id(self.user_id),
            workout: AnyCompletedWorkoutDto::from(&workout),
            coordinator_context: build_coordinator_context(self.user_id, &local),
        };

        tracing::info!(
            activity = %workout.activity(),
            date = %workout.date,
            "Submitting workout"
        );

        let response = match self.client.submit_workout(&payload).await {
            Ok(response) => response,
            Err(e) => return self.fail(e),
        };
        let state = match SyncedState::try_from(response.context) {
            Ok(state) => state,
            Err(e) => return self.fail(e.into()),
        };

        self.commit(PendingCommit {
            state,
            transcript: None,
        })?;

        Ok(WorkoutOutcome {
            server_msg: response.server_msg,
            workout,
        })
    }

    /// Retry only the local save of the last decoded response.
    pub fn retry_persist(&self) -> Result<()> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let commit = lock(&self.pending).take().ok_or(SyncError::NothingPending)?;
        tracing::info!("Retrying save of synced state");
        self.commit(commit)
    }

    /// Drop the pending commit, if any. Returns whether one was dropped.
    pub fn discard_pending(&self) -> bool {
        let dropped = lock(&self.pending).take().is_some();
        if dropped {
            tracing::info!("Discarded unsaved sync result");
        }
        dropped
    }
}
