//! Chat session transcript
//!
//! Ordered (role, text) turns for one interactive session. Lives only as long
//! as the session that owns it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker of a turn, named the way the Gemini API names them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Transcript of one chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    turns: Vec<Turn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(session_id: Uuid) -> Self {
        Self {
            session_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Record a completed user/model exchange.
    pub fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn::user(question));
        self.turns.push(Turn::model(answer));
        self.updated_at = Utc::now();
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.updated_at = Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_exchange() {
        let mut session = ChatSession::new();
        session.record_exchange("What is a SIP?", "A systematic investment plan...");

        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[0].role, Role::User);
        assert_eq!(session.turns()[1].role, Role::Model);
        assert_eq!(session.turns()[1].text, "A systematic investment plan...");
    }

    #[test]
    fn test_clear() {
        let mut session = ChatSession::new();
        session.record_exchange("q", "a");
        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(Role::User.as_str(), "user");
    }
}
