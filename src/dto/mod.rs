// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Wire representations exchanged with the coordinator.
//!
//! Model → DTO conversions are infallible `From` impls. DTO → model
//! conversions are `TryFrom` where a grade string has to be parsed, and
//! plain `From` otherwise.

pub mod completed;
pub mod context;
pub mod payload;
pub mod plan;

pub use completed::{AnyCompletedWorkoutDto, CompletedClimbingDto, CompletedRouteDto, CompletedRunningDto};
pub use context::{CoordinatorContext, FitnessLevelDto, UserDefinedGoalDto};
pub use payload::{ChatPayload, ChatResponse, WorkoutPayload, WorkoutResponse};
pub use plan::{AnyWorkoutSessionDto, ClimbRouteDto, ClimbingWorkoutDto, DailyWorkoutDto, RunningWorkoutDto};
