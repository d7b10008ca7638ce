use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(format!("Unknown message role: {}", other)),
        }
    }
}

/// A single message stored in a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        conversation_id: Uuid,
        role: MessageRole,
        content: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            role,
            content: content.into(),
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            assert_eq!(role.as_str().parse::<MessageRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_rejected() {
        assert!("tool".parse::<MessageRole>().is_err());
    }

    #[test]
    fn message_serializes_timestamp() {
        let message = Message::new(Uuid::new_v4(), MessageRole::User, "hi", None);
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["role"], "user");
        assert!(json["timestamp"].is_string());
        assert!(json.get("metadata").is_none());
        assert!(json["conversationId"].is_string());
    }
}
