// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Local store: the on-device source of truth between syncs.

pub mod schema;
mod store;

pub use schema::SCHEMA_VERSION;
pub use store::LocalStore;

use crate::models::{DailyWorkout, FitnessLevel, Goal};

/// The collections the coordinator owns: goals, plans and fitness levels.
/// They are sent in every request context and replaced wholesale by every
/// applied response. Workout history is not part of it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncedState {
    pub goals: Vec<Goal>,
    pub plans: Vec<DailyWorkout>,
    pub fitness_levels: Vec<FitnessLevel>,
}
