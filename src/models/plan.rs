// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Training plans authored by the coaching agent.
//!
//! Plans are never edited locally; every successful sync replaces them.

use crate::models::{ActivityType, GradeValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One planned day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWorkout {
    pub tracking_id: Uuid,
    pub date: DateTime<Utc>,
    pub sessions: Vec<WorkoutSession>,
}

impl DailyWorkout {
    /// Activities planned for the day, in session order, without repeats.
    pub fn activities(&self) -> Vec<ActivityType> {
        let mut seen = Vec::new();
        for activity in self.sessions.iter().map(WorkoutSession::activity) {
            if !seen.contains(&activity) {
                seen.push(activity);
            }
        }
        seen
    }
}

/// A planned session; the variant is the activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkoutSession {
    Climbing(ClimbingWorkout),
    Running(RunningWorkout),
}

impl WorkoutSession {
    pub fn activity(&self) -> ActivityType {
        match self {
            WorkoutSession::Climbing(_) => ActivityType::Climbing,
            WorkoutSession::Running(_) => ActivityType::Running,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            WorkoutSession::Climbing(c) => &c.description,
            WorkoutSession::Running(r) => &r.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbingWorkout {
    pub description: String,
    pub routes: Vec<ClimbRoute>,
}

/// A route to attempt during a planned climbing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbRoute {
    pub id: Uuid,
    pub grade: GradeValue,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningWorkout {
    pub description: String,
    pub distance_km: f64,
    /// Target heart rate (bpm)
    pub heart_rate: i32,
    /// Meters
    pub elevation_gain: i32,
    /// Seconds per kilometer
    pub pace_sec_per_km: f64,
}
