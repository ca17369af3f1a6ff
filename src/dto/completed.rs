// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Completed workouts as uploaded to the coordinator.

use crate::error::MappingError;
use crate::models::{
    ClimbStyle, CompletedClimbing, CompletedDetails, CompletedRoute, CompletedRunning,
    CompletedWorkout, GradeRepr,
};
use crate::time_utils::wire_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity", rename_all = "lowercase")]
pub enum AnyCompletedWorkoutDto {
    Climbing(CompletedClimbingDto),
    Running(CompletedRunningDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedClimbingDto {
    pub user_notes: String,
    #[serde(with = "wire_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub routes: Vec<CompletedRouteDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRouteDto {
    pub grade: GradeRepr,
    pub attempts: u32,
    pub send: bool,
    pub style: ClimbStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRunningDto {
    pub user_notes: String,
    #[serde(with = "wire_date")]
    pub date: DateTime<Utc>,
    pub distance_km: f64,
    pub avg_heart_rate: f64,
    pub elevation_gain: f64,
    /// Seconds per kilometer.
    pub avg_pace_per_km: f64,
}

impl From<&CompletedWorkout> for AnyCompletedWorkoutDto {
    fn from(workout: &CompletedWorkout) -> Self {
        match &workout.details {
            CompletedDetails::Climbing(c) => AnyCompletedWorkoutDto::Climbing(CompletedClimbingDto {
                user_notes: workout.notes.clone(),
                date: workout.date,
                routes: c
                    .routes
                    .iter()
                    .map(|r| CompletedRouteDto {
                        grade: r.grade.into(),
                        attempts: r.attempts,
                        send: r.sent,
                        style: r.style,
                    })
                    .collect(),
            }),
            CompletedDetails::Running(r) => AnyCompletedWorkoutDto::Running(CompletedRunningDto {
                user_notes: workout.notes.clone(),
                date: workout.date,
                distance_km: r.distance_km,
                avg_heart_rate: r.avg_heart_rate,
                elevation_gain: r.elevation_gain_m,
                avg_pace_per_km: r.avg_pace_sec_per_km,
            }),
        }
    }
}

/// The local id never travels, so decoding assigns a fresh one.
impl TryFrom<AnyCompletedWorkoutDto> for CompletedWorkout {
    type Error = MappingError;

    fn try_from(dto: AnyCompletedWorkoutDto) -> Result<Self, Self::Error> {
        let (notes, date, details) = match dto {
            AnyCompletedWorkoutDto::Climbing(c) => {
                let routes = c
                    .routes
                    .into_iter()
                    .map(|r| {
                        Ok(CompletedRoute {
                            grade: r.grade.try_into()?,
                            attempts: r.attempts,
                            sent: r.send,
                            style: r.style,
                        })
                    })
                    .collect::<Result<_, MappingError>>()?;
                (
                    c.user_notes,
                    c.date,
                    CompletedDetails::Climbing(CompletedClimbing { routes }),
                )
            }
            AnyCompletedWorkoutDto::Running(r) => (
                r.user_notes,
                r.date,
                CompletedDetails::Running(CompletedRunning {
                    distance_km: r.distance_km,
                    avg_heart_rate: r.avg_heart_rate,
                    elevation_gain_m: r.elevation_gain,
                    avg_pace_sec_per_km: r.avg_pace_per_km,
                }),
            ),
        };

        Ok(CompletedWorkout {
            id: Uuid::new_v4(),
            notes,
            date,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::to_wire_precision;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_climbing_wire_shape() {
        let date = Utc.with_ymd_and_hms(2025, 10, 14, 18, 30, 0).unwrap();
        let workout = CompletedWorkout::climbing(
            "Good skin day",
            date,
            vec![CompletedRoute {
                grade: "5.11a".parse().unwrap(),
                attempts: 3,
                sent: true,
                style: ClimbStyle::OnSite,
            }],
        );

        let value = serde_json::to_value(AnyCompletedWorkoutDto::from(&workout)).unwrap();
        assert_eq!(
            value,
            json!({
                "activity": "climbing",
                "userNotes": "Good skin day",
                "date": "2025-10-14T18:30:00.000000Z",
                "routes": [{"grade": "5.11A", "attempts": 3, "send": true, "style": "onSite"}]
            })
        );
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_running_survives_round_trip() {
        let date = Utc.timestamp_opt(1_760_460_439, 503_265_789).unwrap();
        let run = CompletedRunning {
            distance_km: 10.2,
            avg_heart_rate: 151.0,
            elevation_gain_m: 84.0,
            avg_pace_sec_per_km: 312.5,
        };
        let workout = CompletedWorkout::running("Tempo", date, run.clone());

        let json = serde_json::to_string(&AnyCompletedWorkoutDto::from(&workout)).unwrap();
        let decoded: AnyCompletedWorkoutDto = serde_json::from_str(&json).unwrap();
        let back = CompletedWorkout::try_from(decoded).unwrap();

        assert_eq!(back.notes, "Tempo");
        assert_eq!(back.date, to_wire_precision(date));
        assert_eq!(back.details, CompletedDetails::Running(run));
    }

    #[test]
    fn test_unknown_activity_rejected() {
        let value = json!({"activity": "yoga", "userNotes": "", "date": "2025-10-14T18:30:00Z"});
        assert!(serde_json::from_value::<AnyCompletedWorkoutDto>(value).is_err());
    }
}
