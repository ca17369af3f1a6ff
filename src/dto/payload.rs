// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Request and response bodies for the coordinator endpoints.

use crate::dto::{AnyCompletedWorkoutDto, CoordinatorContext};
use crate::models::ChatMessage;
use crate::time_utils::wire_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub messages: Vec<ChatMessage>,
    #[serde(rename = "coordinatorContext")]
    pub coordinator_context: CoordinatorContext,
    #[serde(with = "wire_date")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub conversation_id: String,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(alias = "serverMessage")]
    pub server_msg: String,
    /// Full transcript, replacing the local one.
    pub messages: Vec<ChatMessage>,
    pub context: CoordinatorContext,
}

/// Body of `POST /submit_workout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub workout: AnyCompletedWorkoutDto,
    #[serde(rename = "coordinatorContext")]
    pub coordinator_context: CoordinatorContext,
}

/// Response of `POST /submit_workout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutResponse {
    #[serde(alias = "serverMessage")]
    pub server_msg: String,
    pub context: CoordinatorContext,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn empty_context() -> CoordinatorContext {
        CoordinatorContext {
            user_id: "204fc006-cc86-403a-9b7f-60cd27e443ad".to_string(),
            goals: vec![],
            current_training_plan: vec![],
            activity_fitness_levels: vec![],
        }
    }

    #[test]
    fn test_chat_payload_keys() {
        let payload = ChatPayload {
            messages: vec![ChatMessage::user("Plan my week")],
            coordinator_context: empty_context(),
            timestamp: Utc.with_ymd_and_hms(2025, 10, 14, 16, 47, 19).unwrap(),
            user_id: "204fc006-cc86-403a-9b7f-60cd27e443ad".to_string(),
            conversation_id: "conv_default".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();

        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["conversation_id", "coordinatorContext", "messages", "timestamp", "userId"]
        );
        assert_eq!(value["coordinatorContext"]["currentTrainingPlan"], json!([]));
        assert_eq!(value["timestamp"], "2025-10-14T16:47:19.000000Z");
    }

    #[test]
    fn test_response_accepts_server_message_alias() {
        let body = json!({
            "serverMessage": "Logged it.",
            "context": {"userId": "204fc006-cc86-403a-9b7f-60cd27e443ad"}
        });
        let response: WorkoutResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.server_msg, "Logged it.");
    }

    #[test]
    fn test_chat_response_requires_context() {
        let body = json!({"server_msg": "hi", "messages": []});
        assert!(serde_json::from_value::<ChatResponse>(body).is_err());
    }
}
