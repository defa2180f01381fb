use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::emotion::EmotionReading;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// The role name used on the wire by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message of a conversation. Immutable once produced; a history is an
/// ordered `Vec<ConversationTurn>`, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What the chat pipeline hands back to the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Normalized, bulleted reply text.
    pub reply_text: String,
    /// Follow-up prompts. Three entries, except for the empty-message reply.
    pub suggestions: Vec<String>,
}

/// A turn as kept by a conversation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTurn {
    pub turn: ConversationTurn,
    /// Emotion detected in user turns; `None` for assistant turns.
    #[serde(default)]
    pub emotion: Option<EmotionReading>,
    pub created_at: DateTime<Utc>,
}

/// Summary of a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// The unique identifier for the session (UUID).
    pub id: String,
    /// The title of the session, auto-generated from the first message.
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
