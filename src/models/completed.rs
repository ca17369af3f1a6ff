// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Workouts the user actually performed.
//!
//! History is authored locally and uploaded; server responses never
//! overwrite it.

use crate::models::{ActivityType, ClimbStyle, GradeValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed workout: shared fields plus an activity-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWorkout {
    /// Local identifier, used for deletion. Not sent to the coordinator.
    pub id: Uuid,
    pub notes: String,
    pub date: DateTime<Utc>,
    pub details: CompletedDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompletedDetails {
    Climbing(CompletedClimbing),
    Running(CompletedRunning),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedClimbing {
    pub routes: Vec<CompletedRoute>,
}

/// One attempted route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRoute {
    pub grade: GradeValue,
    pub attempts: u32,
    pub sent: bool,
    pub style: ClimbStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRunning {
    pub distance_km: f64,
    /// bpm
    pub avg_heart_rate: f64,
    /// Meters
    pub elevation_gain_m: f64,
    /// Seconds per kilometer
    pub avg_pace_sec_per_km: f64,
}

impl CompletedWorkout {
    pub fn climbing(notes: impl Into<String>, date: DateTime<Utc>, routes: Vec<CompletedRoute>) -> Self {
        Self {
            id: Uuid::new_v4(),
            notes: notes.into(),
            date,
            details: CompletedDetails::Climbing(CompletedClimbing { routes }),
        }
    }

    pub fn running(notes: impl Into<String>, date: DateTime<Utc>, run: CompletedRunning) -> Self {
        Self {
            id: Uuid::new_v4(),
            notes: notes.into(),
            date,
            details: CompletedDetails::Running(run),
        }
    }

    /// Activity derived from the payload, so it cannot disagree with it.
    pub fn activity(&self) -> ActivityType {
        match self.details {
            CompletedDetails::Climbing(_) => ActivityType::Climbing,
            CompletedDetails::Running(_) => ActivityType::Running,
        }
    }
}

impl CompletedClimbing {
    /// Number of routes sent.
    pub fn sends(&self) -> usize {
        self.routes.iter().filter(|r| r.sent).count()
    }

    /// Hardest sent grade, if any route was sent.
    pub fn hardest_send(&self) -> Option<GradeValue> {
        self.routes.iter().filter(|r| r.sent).map(|r| r.grade).max()
    }
}
