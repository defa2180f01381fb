use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::engine::chat_pipeline::ChatReplyPipeline;
use crate::engine::emotion::detect_emotion;
use crate::engine::title::{make_title, truncate_title, DEFAULT_TITLE, DEFAULT_TITLE_WORDS};
use crate::error::AppError;
use crate::models::{ChatReply, ConversationTurn, SessionInfo, StoredTurn};
use crate::store::ConversationStore;

/// Reply sent back for a blank message.
pub const EMPTY_MESSAGE_REPLY: &str = "Empty message";

/// Title given to sessions renamed to nothing.
pub const UNTITLED_CHAT: &str = "Untitled Chat";

/// Runs one user message through a stored chat session.
pub struct ChatService {
    store: Arc<dyn ConversationStore>,
    pipeline: ChatReplyPipeline,
}

impl ChatService {
    pub fn new(store: Arc<dyn ConversationStore>, pipeline: ChatReplyPipeline) -> Self {
        Self { store, pipeline }
    }

    pub async fn create_session(&self) -> Result<SessionInfo, AppError> {
        self.store.create_session(Some(DEFAULT_TITLE.to_string())).await
    }

    pub async fn rename(&self, session_id: &str, title: &str) -> Result<SessionInfo, AppError> {
        let title = truncate_title(title);
        let title = if title.is_empty() {
            UNTITLED_CHAT.to_string()
        } else {
            title
        };
        self.store.set_title(session_id, title).await
    }

    /// Handles one message:
    /// 1. Blank text is answered with [`EMPTY_MESSAGE_REPLY`] and not stored.
    /// 2. History is read before the new turn is stored.
    /// 3. The user turn is stored with its detected emotion.
    /// 4. An untitled session is named after the message.
    /// 5. The reply is generated and stored as the assistant turn.
    #[instrument(skip(self, text))]
    pub async fn send(&self, session_id: &str, text: &str) -> Result<ChatReply, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(ChatReply {
                reply_text: EMPTY_MESSAGE_REPLY.to_string(),
                suggestions: Vec::new(),
            });
        }

        let session = self.store.session(session_id).await?;
        let history = self.store.history(session_id).await?;

        let emotion = detect_emotion(text);
        if emotion.is_crisis {
            warn!("Crisis language detected in session {}", session_id);
        }
        self.store
            .append_turn(
                session_id,
                StoredTurn {
                    turn: ConversationTurn::user(text),
                    emotion: Some(emotion),
                    created_at: Utc::now(),
                },
            )
            .await?;

        if needs_title(session.title.as_deref()) {
            let title = truncate_title(&make_title(text, DEFAULT_TITLE_WORDS));
            info!("Naming session {} '{}'", session_id, title);
            self.store.set_title(session_id, title).await?;
        }

        let reply = self.pipeline.reply(&history, text).await;

        self.store
            .append_turn(
                session_id,
                StoredTurn {
                    turn: ConversationTurn::assistant(reply.reply_text.clone()),
                    emotion: None,
                    created_at: Utc::now(),
                },
            )
            .await?;

        Ok(reply)
    }
}

fn needs_title(title: Option<&str>) -> bool {
    match title {
        None => true,
        Some(t) => {
            let t = t.trim();
            t.is_empty() || t.to_lowercase().starts_with("new chat")
        }
    }
}
