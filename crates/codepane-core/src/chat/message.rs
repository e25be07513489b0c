use crate::project::IdSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A message as shown in the chat pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(ids: &mut impl IdSource, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(ids: &mut impl IdSource, content: impl Into<String>) -> Self {
        Self::new(ids, ChatRole::User, content)
    }

    pub fn assistant(ids: &mut impl IdSource, content: impl Into<String>) -> Self {
        Self::new(ids, ChatRole::Assistant, content)
    }

    pub fn is_assistant(&self) -> bool {
        self.role == ChatRole::Assistant
    }
}
