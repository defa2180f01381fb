//! Conversation persistence seam.
//!
//! The engine never touches storage; the caller injects a `ConversationStore`.
//! Stores are append-only: turns are never edited or removed.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ConversationTurn, SessionInfo, StoredTurn};

#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Creates an empty session with the given title.
    async fn create_session(&self, title: Option<String>) -> Result<SessionInfo, AppError>;

    async fn session(&self, session_id: &str) -> Result<SessionInfo, AppError>;

    /// Appends a turn at the end of the session.
    async fn append_turn(&self, session_id: &str, turn: StoredTurn) -> Result<(), AppError>;

    /// All turns of the session, oldest first.
    async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, AppError>;

    async fn set_title(&self, session_id: &str, title: String) -> Result<SessionInfo, AppError>;
}

struct SessionRecord {
    info: SessionInfo,
    turns: Vec<StoredTurn>,
}

/// Process-local store, for the CLI and for tests.
#[derive(Default)]
pub struct InMemoryConversationStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored turns including their metadata, oldest first.
    pub async fn stored_turns(&self, session_id: &str) -> Result<Vec<StoredTurn>, AppError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|record| record.turns.clone())
            .ok_or_else(|| not_found(session_id))
    }
}

fn not_found(session_id: &str) -> AppError {
    AppError::NotFound(format!("session {}", session_id))
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create_session(&self, title: Option<String>) -> Result<SessionInfo, AppError> {
        let now = Utc::now();
        let info = SessionInfo {
            id: Uuid::new_v4().to_string(),
            title,
            created_at: now,
            updated_at: now,
        };
        debug!("Created session {}", info.id);

        self.sessions.write().await.insert(
            info.id.clone(),
            SessionRecord {
                info: info.clone(),
                turns: Vec::new(),
            },
        );
        Ok(info)
    }

    async fn session(&self, session_id: &str) -> Result<SessionInfo, AppError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|record| record.info.clone())
            .ok_or_else(|| not_found(session_id))
    }

    async fn append_turn(&self, session_id: &str, turn: StoredTurn) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.get_mut(session_id).ok_or_else(|| not_found(session_id))?;
        record.info.updated_at = Utc::now();
        record.turns.push(turn);
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, AppError> {
        let sessions = self.sessions.read().await;
        let record = sessions.get(session_id).ok_or_else(|| not_found(session_id))?;
        Ok(record.turns.iter().map(|stored| stored.turn.clone()).collect())
    }

    async fn set_title(&self, session_id: &str, title: String) -> Result<SessionInfo, AppError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.get_mut(session_id).ok_or_else(|| not_found(session_id))?;
        record.info.title = Some(title);
        record.info.updated_at = Utc::now();
        Ok(record.info.clone())
    }
}
