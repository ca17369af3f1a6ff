// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Goals, fitness levels and the coordinator context envelope.

use crate::dto::DailyWorkoutDto;
use crate::models::{ActivityType, FitnessLevel, Goal};
use crate::time_utils::{wire_date, wire_date_opt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedGoalDto {
    pub id: Uuid,
    pub goal_activity: ActivityType,
    pub title: String,
    pub description: String,
    #[serde(with = "wire_date")]
    pub goal_deadline: DateTime<Utc>,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessLevelDto {
    pub activity: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_fitness_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_date_opt")]
    pub user_defined_fitness_level_updated_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_defined_fitness_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_date_opt")]
    pub agent_fitness_level_updated_date: Option<DateTime<Utc>>,
}

/// Snapshot of everything the coordinator is allowed to read and rewrite.
/// Sent with every request and returned, possibly modified, with every
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorContext {
    /// Lowercase UUID string.
    pub user_id: String,
    #[serde(default)]
    pub goals: Vec<UserDefinedGoalDto>,
    #[serde(default)]
    pub current_training_plan: Vec<DailyWorkoutDto>,
    #[serde(default)]
    pub activity_fitness_levels: Vec<FitnessLevelDto>,
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl From<&Goal> for UserDefinedGoalDto {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id,
            goal_activity: goal.activity,
            title: goal.title.clone(),
            description: goal.description.clone(),
            goal_deadline: goal.deadline,
            is_completed: goal.is_completed,
        }
    }
}

impl From<UserDefinedGoalDto> for Goal {
    fn from(dto: UserDefinedGoalDto) -> Self {
        Self {
            id: dto.id,
            activity: dto.goal_activity,
            title: dto.title,
            description: dto.description,
            deadline: dto.goal_deadline,
            is_completed: dto.is_completed,
        }
    }
}

impl From<&FitnessLevel> for FitnessLevelDto {
    fn from(level: &FitnessLevel) -> Self {
        Self {
            activity: level.activity,
            user_defined_fitness_level: level.user_assessment.clone(),
            user_defined_fitness_level_updated_date: level.user_updated_at,
            agent_defined_fitness_level: level.agent_assessment.clone(),
            agent_fitness_level_updated_date: level.agent_updated_at,
        }
    }
}

impl From<FitnessLevelDto> for FitnessLevel {
    fn from(dto: FitnessLevelDto) -> Self {
        Self {
            activity: dto.activity,
            user_assessment: dto.user_defined_fitness_level,
            user_updated_at: dto.user_defined_fitness_level_updated_date,
            agent_assessment: dto.agent_defined_fitness_level,
            agent_updated_at: dto.agent_fitness_level_updated_date,
        }
    }
}
