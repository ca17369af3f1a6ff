// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Coordinator context assembly and the decoded state it carries back.
//!
//! The context is rebuilt from a fresh store read before every request and
//! never cached, so each call reflects local edits made since the last one.

use crate::db::SyncedState;
use crate::dto::{CoordinatorContext, DailyWorkoutDto, FitnessLevelDto, UserDefinedGoalDto};
use crate::error::MappingError;
use crate::models::{DailyWorkout, FitnessLevel, Goal};
use uuid::Uuid;

/// Build the context for one request from the current store contents.
pub fn build_coordinator_context(user_id: Uuid, state: &SyncedState) -> CoordinatorContext {
    CoordinatorContext {
        user_id: wire_user_id(user_id),
        goals: state.goals.iter().map(UserDefinedGoalDto::from).collect(),
        current_training_plan: state.plans.iter().map(DailyWorkoutDto::from).collect(),
        activity_fitness_levels: state
            .fitness_levels
            .iter()
            .map(FitnessLevelDto::from)
            .collect(),
    }
}

/// User ids travel as lowercase hyphenated strings.
pub fn wire_user_id(user_id: Uuid) -> String {
    user_id.hyphenated().to_string().to_lowercase()
}

impl TryFrom<CoordinatorContext> for SyncedState {
    type Error = MappingError;

    fn try_from(ctx: CoordinatorContext) -> Result<Self, Self::Error> {
        let plans = ctx
            .current_training_plan
            .into_iter()
            .map(DailyWorkout::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        // One record per activity; a later duplicate wins.
        let mut fitness_levels: Vec<FitnessLevel> = Vec::new();
        for level in ctx.activity_fitness_levels.into_iter().map(FitnessLevel::from) {
            if let Some(existing) = fitness_levels.iter_mut().find(|l| l.activity == level.activity) {
                tracing::debug!(activity = %level.activity, "Duplicate fitness level in context");
                *existing = level;
            } else {
                fitness_levels.push(level);
            }
        }

        Ok(Self {
            goals: ctx.goals.into_iter().map(Goal::from).collect(),
            plans,
            fitness_levels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityType, ClimbRoute, ClimbingWorkout, WorkoutSession};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn user() -> Uuid {
        Uuid::parse_str("204FC006-CC86-403A-9B7F-60CD27E443AD").unwrap()
    }

    #[test]
    fn test_empty_store_gives_empty_context() {
        let ctx = build_coordinator_context(user(), &SyncedState::default());
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": "204fc006-cc86-403a-9b7f-60cd27e443ad",
                "goals": [],
                "currentTrainingPlan": [],
                "activityFitnessLevels": []
            })
        );
    }

    #[test]
    fn test_context_round_trips_into_same_state() {
        let date = Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap();
        let state = SyncedState {
            goals: vec![Goal::new(ActivityType::Climbing, "Send V6", "", date)],
            plans: vec![DailyWorkout {
                tracking_id: Uuid::new_v4(),
                date,
                sessions: vec![WorkoutSession::Climbing(ClimbingWorkout {
                    description: "Projecting".to_string(),
                    routes: vec![ClimbRoute {
                        id: Uuid::new_v4(),
                        grade: "V6".parse().unwrap(),
                        description: "Roof".to_string(),
                    }],
                })],
            }],
            fitness_levels: vec![FitnessLevel::empty(ActivityType::Climbing)],
        };

        let ctx = build_coordinator_context(user(), &state);
        let json = serde_json::to_string(&ctx).unwrap();
        let decoded =
            SyncedState::try_from(serde_json::from_str::<CoordinatorContext>(&json).unwrap())
                .unwrap();

        assert_eq!(decoded, state);
    }

    #[test]
    fn test_duplicate_fitness_levels_keep_last() {
        let ctx: CoordinatorContext = serde_json::from_value(json!({
            "userId": "204fc006-cc86-403a-9b7f-60cd27e443ad",
            "activityFitnessLevels": [
                {"activity": "running", "agentDefinedFitnessLevel": "old"},
                {"activity": "climbing"},
                {"activity": "running", "agentDefinedFitnessLevel": "new"}
            ]
        }))
        .unwrap();

        let state = SyncedState::try_from(ctx).unwrap();
        assert_eq!(state.fitness_levels.len(), 2);
        let running = state
            .fitness_levels
            .iter()
            .find(|l| l.activity == ActivityType::Running)
            .unwrap();
        assert_eq!(running.agent_assessment.as_deref(), Some("new"));
    }
}
