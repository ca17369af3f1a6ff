// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Dojo Coach: local state and sync for a remote climbing and running coach
//!
//! This crate owns the on-device goals, fitness levels, training plans and
//! workout history, and keeps them in step with a stateless coordinator
//! service that rewrites them on every exchange.

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use error::{Result, SyncError};
