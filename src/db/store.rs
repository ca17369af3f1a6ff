// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! SQLite-backed local store.
//!
//! One connection behind a mutex. Every multi-row write runs in a
//! transaction, so a failed sync commit leaves the previous state in place.

use super::schema::{SCHEMA, SCHEMA_VERSION};
use super::SyncedState;
use crate::error::StoreError;
use crate::models::{ActivityType, ChatMessage, CompletedWorkout, DailyWorkout, FitnessLevel, Goal};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// The on-device store for goals, fitness levels, plans, workout history
/// and chat transcripts.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open or create a store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        Self::initialize(Connection::open(path)?)
    }

    /// Open a store that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(mut conn: Connection) -> Result<Self, StoreError> {
        let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        match version {
            0 => {
                let tx = conn.transaction()?;
                tx.execute_batch(SCHEMA)?;
                tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
                tx.commit()?;
                tracing::info!(version = SCHEMA_VERSION, "Created local store schema");
            }
            SCHEMA_VERSION => {}
            found => {
                return Err(StoreError::SchemaVersion {
                    found,
                    expected: SCHEMA_VERSION,
                })
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    // ========== Reads ==========

    /// Goals, latest deadline first.
    pub fn goals(&self) -> Result<Vec<Goal>, StoreError> {
        read_goals(&*self.conn()?)
    }

    /// Planned days, latest first.
    pub fn plans(&self) -> Result<Vec<DailyWorkout>, StoreError> {
        read_plans(&*self.conn()?)
    }

    /// Fitness levels in activity order.
    pub fn fitness_levels(&self) -> Result<Vec<FitnessLevel>, StoreError> {
        read_fitness_levels(&*self.conn()?)
    }

    /// Completed workouts, latest first.
    pub fn workout_history(&self) -> Result<Vec<CompletedWorkout>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, notes, details_json FROM workout_history
             ORDER BY date DESC, id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(WorkoutRow {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    notes: row.get(2)?,
                    details_json: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(WorkoutRow::into_workout).collect()
    }

    /// Goals, plans and fitness levels read under one lock.
    pub fn synced_state(&self) -> Result<SyncedState, StoreError> {
        let conn = self.conn()?;
        Ok(SyncedState {
            goals: read_goals(&conn)?,
            plans: read_plans(&conn)?,
            fitness_levels: read_fitness_levels(&conn)?,
        })
    }

    /// Chat items of one conversation, oldest first.
    pub fn transcript(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT message_json FROM transcript WHERE conversation_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![conversation_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter().map(|raw| from_json(raw)).collect()
    }

    /// When a coordinator response was last applied.
    pub fn last_synced_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let raw: Option<String> = self.conn()?.query_row(
            "SELECT last_synced_at FROM sync_state WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        raw.as_deref().map(parse_time).transpose()
    }

    // ========== Goals ==========

    pub fn insert_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        write_goal(&*self.conn()?, goal)
    }

    pub fn set_goal_completed(&self, id: Uuid, completed: bool) -> Result<(), StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE goals SET is_completed = ?1 WHERE id = ?2",
            params![completed, id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("goal {id}")));
        }
        Ok(())
    }

    pub fn delete_goal(&self, id: Uuid) -> Result<(), StoreError> {
        let changed = self
            .conn()?
            .execute("DELETE FROM goals WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("goal {id}")));
        }
        Ok(())
    }

    // ========== Fitness levels ==========

    /// Replace the record for `level.activity`.
    pub fn upsert_fitness_level(&self, level: &FitnessLevel) -> Result<(), StoreError> {
        write_fitness_level(&*self.conn()?, level)
    }

    /// Record the user's own assessment; the agent's is left as is.
    pub fn set_user_assessment(
        &self,
        activity: ActivityType,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO fitness_levels (activity, user_assessment, user_updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(activity) DO UPDATE SET
                 user_assessment = excluded.user_assessment,
                 user_updated_at = excluded.user_updated_at",
            params![activity.as_str(), text, to_sql_time(&now)],
        )?;
        Ok(())
    }

    /// Seed an empty record for every activity that has none.
    pub fn ensure_fitness_levels(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut seeded = 0;
        for activity in ActivityType::ALL {
            seeded += tx.execute(
                "INSERT OR IGNORE INTO fitness_levels (activity) VALUES (?1)",
                params![activity.as_str()],
            )?;
        }
        tx.commit()?;

        if seeded > 0 {
            tracing::debug!(seeded, "Seeded fitness levels");
        }
        Ok(())
    }

    // ========== Workout history ==========

    /// Save a completed workout. A workout with the same id is replaced, so
    /// saving again before a retried upload does not duplicate it.
    pub fn insert_completed_workout(&self, workout: &CompletedWorkout) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO workout_history (id, activity, date, notes, details_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                workout.id.to_string(),
                workout.activity().as_str(),
                to_sql_time(&workout.date),
                workout.notes,
                to_json(&workout.details)?,
            ],
        )?;
        Ok(())
    }

    pub fn delete_completed_workout(&self, id: Uuid) -> Result<(), StoreError> {
        let changed = self.conn()?.execute(
            "DELETE FROM workout_history WHERE id = ?1",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("workout {id}")));
        }
        Ok(())
    }

    // ========== Sync ==========

    /// Wipe goals, plans and fitness levels and replace them with `state`,
    /// in one transaction. History is untouched.
    pub fn replace_synced_state(&self, state: &SyncedState) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        write_synced_state(&tx, state)?;
        tx.commit()?;
        Ok(())
    }

    /// [`replace_synced_state`](Self::replace_synced_state) plus the
    /// conversation's new transcript, in the same transaction.
    pub fn commit_chat(
        &self,
        state: &SyncedState,
        conversation_id: &str,
        messages: &[ChatMessage],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        write_synced_state(&tx, state)?;
        tx.execute(
            "DELETE FROM transcript WHERE conversation_id = ?1",
            params![conversation_id],
        )?;
        for (position, message) in messages.iter().enumerate() {
            tx.execute(
                "INSERT INTO transcript (conversation_id, position, message_json)
                 VALUES (?1, ?2, ?3)",
                params![conversation_id, position as i64, to_json(message)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Duplicate keys within `state` are resolved by the last entry.
fn write_synced_state(conn: &Connection, state: &SyncedState) -> Result<(), StoreError> {
    conn.execute("DELETE FROM goals", [])?;
    conn.execute("DELETE FROM plans", [])?;
    conn.execute("DELETE FROM fitness_levels", [])?;

    for goal in &state.goals {
        write_goal(conn, goal)?;
    }
    for day in &state.plans {
        conn.execute(
            "INSERT OR REPLACE INTO plans (tracking_id, date, sessions_json) VALUES (?1, ?2, ?3)",
            params![
                day.tracking_id.to_string(),
                to_sql_time(&day.date),
                to_json(&day.sessions)?,
            ],
        )?;
    }
    for level in &state.fitness_levels {
        write_fitness_level(conn, level)?;
    }

    conn.execute(
        "UPDATE sync_state SET last_synced_at = ?1 WHERE id = 1",
        params![to_sql_time(&Utc::now())],
    )?;
    Ok(())
}

fn write_goal(conn: &Connection, goal: &Goal) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO goals (id, activity, title, description, deadline, is_completed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            goal.id.to_string(),
            goal.activity.as_str(),
            goal.title,
            goal.description,
            to_sql_time(&goal.deadline),
            goal.is_completed,
        ],
    )?;
    Ok(())
}

fn write_fitness_level(conn: &Connection, level: &FitnessLevel) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO fitness_levels
             (activity, user_assessment, user_updated_at, agent_assessment, agent_updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            level.activity.as_str(),
            level.user_assessment,
            level.user_updated_at.as_ref().map(to_sql_time),
            level.agent_assessment,
            level.agent_updated_at.as_ref().map(to_sql_time),
        ],
    )?;
    Ok(())
}

fn read_goals(conn: &Connection) -> Result<Vec<Goal>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, activity, title, description, deadline, is_completed FROM goals
         ORDER BY deadline DESC, id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(GoalRow {
                id: row.get(0)?,
                activity: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                deadline: row.get(4)?,
                is_completed: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(GoalRow::into_goal).collect()
}

fn read_plans(conn: &Connection) -> Result<Vec<DailyWorkout>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT tracking_id, date, sessions_json FROM plans ORDER BY date DESC, tracking_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(tracking_id, date, sessions_json)| {
            Ok(DailyWorkout {
                tracking_id: parse_id(&tracking_id)?,
                date: parse_time(&date)?,
                sessions: from_json(&sessions_json)?,
            })
        })
        .collect()
}

fn read_fitness_levels(conn: &Connection) -> Result<Vec<FitnessLevel>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT activity, user_assessment, user_updated_at, agent_assessment, agent_updated_at
         FROM fitness_levels ORDER BY activity",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FitnessRow {
                activity: row.get(0)?,
                user_assessment: row.get(1)?,
                user_updated_at: row.get(2)?,
                agent_assessment: row.get(3)?,
                agent_updated_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(FitnessRow::into_level).collect()
}

// ========== Row types ==========

struct GoalRow {
    id: String,
    activity: String,
    title: String,
    description: String,
    deadline: String,
    is_completed: bool,
}

impl GoalRow {
    fn into_goal(self) -> Result<Goal, StoreError> {
        Ok(Goal {
            id: parse_id(&self.id)?,
            activity: parse_activity(&self.activity)?,
            title: self.title,
            description: self.description,
            deadline: parse_time(&self.deadline)?,
            is_completed: self.is_completed,
        })
    }
}

struct FitnessRow {
    activity: String,
    user_assessment: Option<String>,
    user_updated_at: Option<String>,
    agent_assessment: Option<String>,
    agent_updated_at: Option<String>,
}

impl FitnessRow {
    fn into_level(self) -> Result<FitnessLevel, StoreError> {
        Ok(FitnessLevel {
            activity: parse_activity(&self.activity)?,
            user_assessment: self.user_assessment,
            user_updated_at: self.user_updated_at.as_deref().map(parse_time).transpose()?,
            agent_assessment: self.agent_assessment,
            agent_updated_at: self.agent_updated_at.as_deref().map(parse_time).transpose()?,
        })
    }
}

struct WorkoutRow {
    id: String,
    date: String,
    notes: String,
    details_json: String,
}

impl WorkoutRow {
    fn into_workout(self) -> Result<CompletedWorkout, StoreError> {
        Ok(CompletedWorkout {
            id: parse_id(&self.id)?,
            notes: self.notes,
            date: parse_time(&self.date)?,
            details: from_json(&self.details_json)?,
        })
    }
}

// ========== Column codecs ==========

fn to_sql_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp {raw:?}: {e}")))
}

fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Corrupt(format!("id {raw:?}: {e}")))
}

fn parse_activity(raw: &str) -> Result<ActivityType, StoreError> {
    raw.parse().map_err(StoreError::Corrupt)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Encode(e.to_string()))
}

fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}
