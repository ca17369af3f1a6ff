// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! SQLite schema for the local store.
//!
//! Timestamps are stored as RFC 3339 text with nine fractional digits and a
//! `Z` suffix, so text order is time order. Nested payloads (plan sessions,
//! workout details, chat items) are stored as JSON.

/// Layout version, kept in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS goals (
    id TEXT PRIMARY KEY,
    activity TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    deadline TEXT NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_goals_deadline ON goals(deadline);

-- One row per activity
CREATE TABLE IF NOT EXISTS fitness_levels (
    activity TEXT PRIMARY KEY,
    user_assessment TEXT,
    user_updated_at TEXT,
    agent_assessment TEXT,
    agent_updated_at TEXT
);

CREATE TABLE IF NOT EXISTS plans (
    tracking_id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    sessions_json TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_plans_date ON plans(date);

CREATE TABLE IF NOT EXISTS workout_history (
    id TEXT PRIMARY KEY,
    activity TEXT NOT NULL,
    date TEXT NOT NULL,
    notes TEXT NOT NULL,
    details_json TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_workout_history_date ON workout_history(date);

CREATE TABLE IF NOT EXISTS transcript (
    conversation_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    message_json TEXT NOT NULL,
    PRIMARY KEY (conversation_id, position)
);

-- Single row, touched by every applied sync
CREATE TABLE IF NOT EXISTS sync_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    last_synced_at TEXT
);
INSERT OR IGNORE INTO sync_state (id, last_synced_at) VALUES (1, NULL);
"#;
