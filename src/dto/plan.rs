// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Planned workouts on the wire.
//!
//! Sessions are internally tagged on `activity`; an unknown tag fails the
//! whole decode rather than being skipped.

use crate::error::MappingError;
use crate::models::{
    ClimbRoute, ClimbingWorkout, DailyWorkout, GradeRepr, RunningWorkout, WorkoutSession,
};
use crate::time_utils::wire_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWorkoutDto {
    pub tracking_id: Uuid,
    #[serde(with = "wire_date")]
    pub date: DateTime<Utc>,
    pub sessions: Vec<AnyWorkoutSessionDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity", rename_all = "lowercase")]
pub enum AnyWorkoutSessionDto {
    Climbing(ClimbingWorkoutDto),
    Running(RunningWorkoutDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimbingWorkoutDto {
    pub session_description: String,
    #[serde(default)]
    pub routes: Vec<ClimbRouteDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimbRouteDto {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub grade_value: GradeRepr,
    pub short_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningWorkoutDto {
    pub session_description: String,
    pub distance_km: f64,
    pub heart_rate: i32,
    pub elevation_gain: i32,
    /// Seconds per kilometer, despite the name.
    pub pace_min_per_km: f64,
}

// ─── Model → DTO ─────────────────────────────────────────────────────────────

impl From<&DailyWorkout> for DailyWorkoutDto {
    fn from(day: &DailyWorkout) -> Self {
        Self {
            tracking_id: day.tracking_id,
            date: day.date,
            sessions: day.sessions.iter().map(AnyWorkoutSessionDto::from).collect(),
        }
    }
}

impl From<&WorkoutSession> for AnyWorkoutSessionDto {
    fn from(session: &WorkoutSession) -> Self {
        match session {
            WorkoutSession::Climbing(c) => AnyWorkoutSessionDto::Climbing(ClimbingWorkoutDto {
                session_description: c.description.clone(),
                routes: c
                    .routes
                    .iter()
                    .map(|r| ClimbRouteDto {
                        id: r.id,
                        grade_value: r.grade.into(),
                        short_description: r.description.clone(),
                    })
                    .collect(),
            }),
            WorkoutSession::Running(r) => AnyWorkoutSessionDto::Running(RunningWorkoutDto {
                session_description: r.description.clone(),
                distance_km: r.distance_km,
                heart_rate: r.heart_rate,
                elevation_gain: r.elevation_gain,
                pace_min_per_km: r.pace_sec_per_km,
            }),
        }
    }
}

// ─── DTO → Model ─────────────────────────────────────────────────────────────

impl TryFrom<DailyWorkoutDto> for DailyWorkout {
    type Error = MappingError;

    fn try_from(dto: DailyWorkoutDto) -> Result<Self, Self::Error> {
        Ok(Self {
            tracking_id: dto.tracking_id,
            date: dto.date,
            sessions: dto
                .sessions
                .into_iter()
                .map(WorkoutSession::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<AnyWorkoutSessionDto> for WorkoutSession {
    type Error = MappingError;

    fn try_from(dto: AnyWorkoutSessionDto) -> Result<Self, Self::Error> {
        Ok(match dto {
            AnyWorkoutSessionDto::Climbing(c) => WorkoutSession::Climbing(ClimbingWorkout {
                description: c.session_description,
                routes: c
                    .routes
                    .into_iter()
                    .map(|r| {
                        Ok(ClimbRoute {
                            id: r.id,
                            grade: r.grade_value.try_into()?,
                            description: r.short_description,
                        })
                    })
                    .collect::<Result<_, MappingError>>()?,
            }),
            AnyWorkoutSessionDto::Running(r) => WorkoutSession::Running(RunningWorkout {
                description: r.session_description,
                distance_km: r.distance_km,
                heart_rate: r.heart_rate,
                elevation_gain: r.elevation_gain,
                pace_sec_per_km: r.pace_min_per_km,
            }),
        })
    }
}
