//! Chat reply pipeline: one completion call, bullet normalization, suggestions.
//!
//! Never fails. Any problem with the completion collaborator degrades to a
//! fixed fallback reply so the conversation can go on.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::bullets::normalize_chat_reply;
use super::suggestions::SuggestionPicker;
use super::topics::TopicClassifier;
use crate::actors::messages::CompletionRequest;
use crate::actors::traits::CompletionActor;
use crate::error::AppError;
use crate::models::{ChatReply, ConversationTurn};

pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful AI student assistant.\n\
STRICT BULLET RULES:\n\
1. Answer ONLY in bullet points.\n\
2. MAX 5 bullets.\n\
3. Each bullet must be short.\n\
4. No paragraphs.\n\
5. No emojis unless user uses them.\n";

pub const FALLBACK_REPLY: &str = "• Something went wrong\n• Try again later";
pub const FALLBACK_SUGGESTIONS: [&str; 3] = ["Try again", "Help me", "Explain more"];

/// The reply returned whenever the completion collaborator fails.
pub fn fallback_reply() -> ChatReply {
    ChatReply {
        reply_text: FALLBACK_REPLY.to_string(),
        suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

pub struct ChatReplyPipeline {
    llm: Arc<dyn CompletionActor>,
    classifier: TopicClassifier,
    picker: SuggestionPicker,
    model: String,
    temperature: f32,
}

impl ChatReplyPipeline {
    pub fn new(
        llm: Arc<dyn CompletionActor>,
        picker: SuggestionPicker,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            llm,
            classifier: TopicClassifier::new(),
            picker,
            model: model.into(),
            temperature,
        }
    }

    /// The request sent for `user_text` on top of `history` (oldest first).
    pub fn build_request(&self, history: &[ConversationTurn], user_text: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(ConversationTurn::user(user_text));

        CompletionRequest {
            model: self.model.clone(),
            system_prompt: CHAT_SYSTEM_PROMPT.to_string(),
            messages,
            temperature: self.temperature,
            max_tokens: None,
        }
    }

    /// Produces the assistant reply and three follow-up suggestions.
    #[instrument(skip_all, fields(history_len = history.len()))]
    pub async fn reply(&self, history: &[ConversationTurn], user_text: &str) -> ChatReply {
        match self.try_reply(history, user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat completion failed, sending fallback reply: {}", e);
                fallback_reply()
            }
        }
    }

    async fn try_reply(&self, history: &[ConversationTurn], user_text: &str) -> Result<ChatReply, AppError> {
        let request = self.build_request(history, user_text);
        let raw = self.llm.complete_chat(request).await?;

        let reply_text = normalize_chat_reply(&raw);
        if reply_text.is_empty() {
            return Err(AppError::MalformedCompletion(
                "completion was blank after normalization".to_string(),
            ));
        }

        let category = self.classifier.classify(user_text);
        let suggestions = self.picker.suggest(category);
        info!("Chat reply ready (topic: {}, {} lines)", category, reply_text.lines().count());

        Ok(ChatReply {
            reply_text,
            suggestions,
        })
    }
}
