// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use dojo_coach::config::Config;
use dojo_coach::db::LocalStore;
use dojo_coach::models::{ChatMessage, CompletedWorkout, DailyWorkout, FitnessLevel, Goal};
use dojo_coach::services::{CoordinatorClient, SyncService};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Lowercase form of `Config::test_default().user_id`.
#[allow(dead_code)]
pub const TEST_USER_ID: &str = "204fc006-cc86-403a-9b7f-60cd27e443ad";

/// What the fake coordinator answers with.
#[allow(dead_code)]
pub enum Reply {
    Json(Value),
    Status(u16, String),
    /// 200 with a body that is not the expected JSON.
    Raw(String),
    Delayed(Duration, Value),
}

type Responder = dyn Fn(&str, &Value) -> Reply + Send + Sync;

struct FakeState {
    respond: Box<Responder>,
    received: Mutex<Vec<(String, Value)>>,
}

/// A coordinator stand-in listening on 127.0.0.1.
pub struct FakeCoordinator {
    pub base_url: String,
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeCoordinator {
    /// Requests received so far, as `(endpoint, body)`.
    pub fn received(&self) -> Vec<(String, Value)> {
        self.state.received.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Value {
        self.received()
            .last()
            .map(|(_, body)| body.clone())
            .expect("no request received")
    }
}

async fn handle(State(state): State<Arc<FakeState>>, uri: Uri, Json(body): Json<Value>) -> Response {
    let endpoint = uri.path().trim_start_matches('/').to_string();
    let reply = (state.respond)(&endpoint, &body);
    state.received.lock().unwrap().push((endpoint, body));

    match reply {
        Reply::Json(value) => Json(value).into_response(),
        Reply::Status(code, text) => (StatusCode::from_u16(code).unwrap(), text).into_response(),
        Reply::Raw(text) => (StatusCode::OK, text).into_response(),
        Reply::Delayed(delay, value) => {
            tokio::time::sleep(delay).await;
            Json(value).into_response()
        }
    }
}

/// Start a fake coordinator that answers every request with `respond`.
pub async fn spawn_coordinator<F>(respond: F) -> FakeCoordinator
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    let state = Arc::new(FakeState {
        respond: Box::new(respond),
        received: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/chat", post(handle))
        .route("/submit_workout", post(handle))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeCoordinator {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Answer with the request's own context plus a canned assistant reply,
/// like a coordinator that changed nothing.
#[allow(dead_code)]
pub fn echo_reply(_endpoint: &str, body: &Value) -> Reply {
    let mut messages = body["messages"].as_array().cloned().unwrap_or_default();
    messages.push(assistant_message("Noted."));
    Reply::Json(json!({
        "server_msg": "ok",
        "messages": messages,
        "context": body["coordinatorContext"].clone(),
    }))
}

#[allow(dead_code)]
pub fn assistant_message(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "role": "assistant",
        "status": "completed",
        "type": "message",
        "content": [{"annotations": [], "text": text, "type": "output_text", "logprobs": []}]
    })
}

/// A context as the coordinator would return it after planning a week.
#[allow(dead_code)]
pub fn server_context() -> Value {
    json!({
        "userId": TEST_USER_ID,
        "goals": [{
            "id": "7d4e1f0a-2b3c-4d5e-8f90-a1b2c3d4e5f6",
            "goalActivity": "running",
            "title": "Half marathon under 1:45",
            "description": "Spring race",
            "goalDeadline": "2026-04-12T08:00:00Z",
            "isCompleted": false
        }],
        "currentTrainingPlan": [{
            "tracking_id": "11111111-2222-4333-8444-555555555555",
            "date": "2025-10-15T00:00:00.000000Z",
            "sessions": [
                {"activity": "running", "sessionDescription": "Intervals 6x800m",
                 "distanceKm": 8.0, "heartRate": 165, "elevationGain": 20, "paceMinPerKm": 270.0},
                {"activity": "climbing", "sessionDescription": "Easy mileage",
                 "routes": [{"gradeValue": "5.10a", "shortDescription": "Warm-up"}]}
            ]
        }],
        "activityFitnessLevels": [
            {"activity": "running", "agentDefinedFitnessLevel": "Base built, ready for speed work",
             "agentFitnessLevelUpdatedDate": "2025-10-14T16:47:19.503265Z"},
            {"activity": "climbing"}
        ]
    })
}

/// Config pointed at `base_url` with short timeouts.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::test_default();
    config.api_url = base_url.to_string();
    config.chat_timeout = Duration::from_secs(5);
    config.workout_timeout = Duration::from_secs(5);
    config
}

#[allow(dead_code)]
pub fn sync_service(config: &Config, store: Arc<LocalStore>) -> SyncService {
    SyncService::new(
        CoordinatorClient::new(config),
        store,
        config.user_id,
        config.conversation_id.clone(),
    )
}

/// Everything a sync can touch, for before/after comparisons.
#[derive(Debug, PartialEq)]
pub struct StoreContents {
    pub goals: Vec<Goal>,
    pub plans: Vec<DailyWorkout>,
    pub fitness_levels: Vec<FitnessLevel>,
    pub history: Vec<CompletedWorkout>,
    pub transcript: Vec<ChatMessage>,
}

#[allow(dead_code)]
pub fn contents(store: &LocalStore) -> StoreContents {
    StoreContents {
        goals: store.goals().unwrap(),
        plans: store.plans().unwrap(),
        fitness_levels: store.fitness_levels().unwrap(),
        history: store.workout_history().unwrap(),
        transcript: store.transcript("conv_test").unwrap(),
    }
}

/// A store file in its own temp dir. Keep the dir alive for the test.
#[allow(dead_code)]
pub fn file_store() -> (TempDir, PathBuf, Arc<LocalStore>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coach.db");
    let store = Arc::new(LocalStore::open(&path).unwrap());
    (dir, path, store)
}

/// Makes every sync commit to the store at `path` fail, through a trigger
/// installed from a second connection. Local edits still succeed.
pub struct SyncCommitBlocker {
    conn: rusqlite::Connection,
}

#[allow(dead_code)]
impl SyncCommitBlocker {
    pub fn install(path: &Path) -> Self {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER block_sync_commit BEFORE UPDATE ON sync_state
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();
        Self { conn }
    }

    pub fn release(self) {
        self.conn
            .execute_batch("DROP TRIGGER block_sync_commit;")
            .unwrap();
    }
}
