// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Chat transcript items exchanged with the coordinator.
//!
//! The transcript round-trips through the coordinator on every request, so
//! items are kept in the agent runtime's own shape. Items with a `type`
//! field are selected by it; an item without one must be a user message.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    User(UserMessage),
    Assistant(AssistantMessage),
    Reasoning(ReasoningMessage),
    FunctionCall(FunctionCallMessage),
    FunctionCallOutput(FunctionCallOutputMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub content: String,
    /// Always "user"
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub id: String,
    pub content: Vec<AssistantContent>,
    #[serde(default = "assistant_role")]
    pub role: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantContent {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallMessage {
    pub arguments: String,
    pub call_id: String,
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallOutputMessage {
    pub call_id: String,
    pub output: String,
}

fn assistant_role() -> String {
    "assistant".to_string()
}

/// Items that carry a `type` discriminator.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum TypedItem {
    #[serde(rename = "message")]
    Assistant(AssistantMessage),
    #[serde(rename = "reasoning")]
    Reasoning(ReasoningMessage),
    #[serde(rename = "function_call")]
    FunctionCall(FunctionCallMessage),
    #[serde(rename = "function_call_output")]
    FunctionCallOutput(FunctionCallOutputMessage),
}

impl ChatMessage {
    /// A new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::User(UserMessage {
            content: content.into(),
            role: "user".to_string(),
        })
    }

    /// Text a person would read, if this item has any.
    pub fn text(&self) -> Option<String> {
        match self {
            ChatMessage::User(m) => Some(m.content.clone()),
            ChatMessage::Assistant(m) => Some(
                m.content
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, ChatMessage::User(_))
    }
}

impl Serialize for ChatMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Typed variants borrow-clone into the tagged helper so the `type`
        // field is emitted alongside the payload.
        match self {
            ChatMessage::User(m) => m.serialize(serializer),
            ChatMessage::Assistant(m) => TypedItem::Assistant(m.clone()).serialize(serializer),
            ChatMessage::Reasoning(m) => TypedItem::Reasoning(m.clone()).serialize(serializer),
            ChatMessage::FunctionCall(m) => TypedItem::FunctionCall(m.clone()).serialize(serializer),
            ChatMessage::FunctionCallOutput(m) => {
                TypedItem::FunctionCallOutput(m.clone()).serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for ChatMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;

        if value.get("type").is_some() {
            let item = TypedItem::deserialize(value).map_err(D::Error::custom)?;
            return Ok(match item {
                TypedItem::Assistant(m) => ChatMessage::Assistant(m),
                TypedItem::Reasoning(m) => ChatMessage::Reasoning(m),
                TypedItem::FunctionCall(m) => ChatMessage::FunctionCall(m),
                TypedItem::FunctionCallOutput(m) => ChatMessage::FunctionCallOutput(m),
            });
        }

        match value.get("role").and_then(Value::as_str) {
            Some("user") => UserMessage::deserialize(value)
                .map(ChatMessage::User)
                .map_err(D::Error::custom),
            Some(role) => Err(D::Error::custom(format!(
                "chat item without type has unexpected role {role:?}"
            ))),
            None => Err(D::Error::custom("chat item has neither type nor role")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_every_item_kind() {
        let transcript = json!([
            {"content": "How should I train for 5.12?", "role": "user"},
            {"id": "rs_1", "summary": [], "type": "reasoning"},
            {"arguments": "{\"activity\":\"climbing\"}", "call_id": "call_1",
             "name": "search_workout_memories", "type": "function_call",
             "id": "fc_1", "status": "completed"},
            {"call_id": "call_1", "output": "[]", "type": "function_call_output"},
            {"id": "msg_1", "role": "assistant", "status": "completed", "type": "message",
             "content": [{"annotations": [], "text": "Add a hangboard day.",
                          "type": "output_text", "logprobs": []}]}
        ]);

        let items: Vec<ChatMessage> = serde_json::from_value(transcript).unwrap();
        assert_eq!(items.len(), 5);
        assert!(items[0].is_user());
        assert!(matches!(items[1], ChatMessage::Reasoning(_)));
        assert!(matches!(items[2], ChatMessage::FunctionCall(ref f) if f.name == "search_workout_memories"));
        assert!(matches!(items[3], ChatMessage::FunctionCallOutput(_)));
        assert_eq!(items[4].text().as_deref(), Some("Add a hangboard day."));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let item = json!({"type": "web_search_call", "id": "ws_1"});
        assert!(serde_json::from_value::<ChatMessage>(item).is_err());
    }

    #[test]
    fn test_untyped_non_user_is_rejected() {
        let item = json!({"content": "hi", "role": "system"});
        let err = serde_json::from_value::<ChatMessage>(item).unwrap_err();
        assert!(err.to_string().contains("system"));
    }

    #[test]
    fn test_encoding_restores_type_field() {
        let call = ChatMessage::FunctionCallOutput(FunctionCallOutputMessage {
            call_id: "call_9".to_string(),
            output: "ok".to_string(),
        });
        let encoded = serde_json::to_value(&call).unwrap();
        assert_eq!(encoded["type"], "function_call_output");

        let user = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(user, json!({"content": "hello", "role": "user"}));

        let decoded: ChatMessage = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, call);
    }
}
