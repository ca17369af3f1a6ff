// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Domain models held in the local store.

pub mod activity;
pub mod chat;
pub mod completed;
pub mod fitness;
pub mod goal;
pub mod grade;
pub mod plan;

pub use activity::{ActivityType, ClimbStyle};
pub use chat::ChatMessage;
pub use completed::{
    CompletedClimbing, CompletedDetails, CompletedRoute, CompletedRunning, CompletedWorkout,
};
pub use fitness::FitnessLevel;
pub use goal::Goal;
pub use grade::{GradeParseError, GradeRepr, GradeScale, GradeValue, VGrade, YdsGrade};
pub use plan::{ClimbRoute, ClimbingWorkout, DailyWorkout, RunningWorkout, WorkoutSession};
