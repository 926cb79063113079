//! Core types for chatmem — the exchange unit, the role-tagged message
//! format consumed by the generation pipeline, and session metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Exchange (one question/answer pair)
// ─────────────────────────────────────────────

/// One question/answer pair — the unit of session history.
///
/// Both sides are opaque text; the store never inspects content.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

impl Exchange {
    /// Create a new exchange.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Exchange {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Messages (generation pipeline format)
// ─────────────────────────────────────────────

/// A role-tagged chat message handed to the downstream generation pipeline.
///
/// Each variant maps to a `role` field value when serialized, so a history
/// flattens to the familiar `[{"role": "user", ...}, {"role": "assistant",
/// ...}]` shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "user")]
    User { content: String },

    #[serde(rename = "assistant")]
    Assistant { content: String },
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
        }
    }

    /// The text content, regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Message::User { content } => content,
            Message::Assistant { content } => content,
        }
    }
}

// ─────────────────────────────────────────────
// Session info
// ─────────────────────────────────────────────

/// Snapshot of a session's metadata.
///
/// `exists: false` (with zeroed fields) stands in for a missing session —
/// absence is a value here, not an error.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub exists: bool,
    pub message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl SessionInfo {
    /// Info record for a session that does not exist.
    pub fn missing() -> Self {
        SessionInfo {
            exists: false,
            message_count: 0,
            last_activity: None,
            is_active: false,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_serialization() {
        let msg = Message::user("Hello, world!");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello, world!");
    }

    #[test]
    fn test_assistant_message_serialization() {
        let msg = Message::assistant("The answer is 42.");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "The answer is 42.");
    }

    #[test]
    fn test_message_deserialization() {
        let json = serde_json::json!({"role": "user", "content": "Hi there"});
        let msg: Message = serde_json::from_value(json).unwrap();

        match msg {
            Message::User { content } => assert_eq!(content, "Hi there"),
            _ => panic!("Expected user message"),
        }
    }

    #[test]
    fn test_message_content_accessor() {
        assert_eq!(Message::user("q").content(), "q");
        assert_eq!(Message::assistant("a").content(), "a");
    }

    #[test]
    fn test_exchange_round_trip() {
        let exchange = Exchange::new("What is Rust?", "A systems language.");
        let json_str = serde_json::to_string(&exchange).unwrap();
        let back: Exchange = serde_json::from_str(&json_str).unwrap();

        assert_eq!(exchange, back);
    }

    #[test]
    fn test_session_info_missing() {
        let info = SessionInfo::missing();
        assert!(!info.exists);
        assert_eq!(info.message_count, 0);
        assert!(info.last_activity.is_none());
        assert!(!info.is_active);
    }

    #[test]
    fn test_session_info_missing_serialization() {
        let json = serde_json::to_value(SessionInfo::missing()).unwrap();

        assert_eq!(json["exists"], false);
        assert_eq!(json["messageCount"], 0);
        // Absent, not null
        assert!(json.get("lastActivity").is_none());
    }
}
