use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::models::ConversationTurn;

// Re-export AppError for convenience
pub use crate::error::AppError;

/// One chat-completion call: a system instruction, then the turns in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub messages: Vec<ConversationTurn>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Messages that can be sent to the LLM actor.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request to generate a complete text response.
    Complete {
        request: CompletionRequest,
        /// A channel to send the final `String` result back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}

/// A message as sent to an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct WireRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

impl From<&CompletionRequest> for WireRequest {
    fn from(request: &CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: request.system_prompt.clone(),
        });
        messages.extend(request.messages.iter().map(|turn| WireMessage {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        }));

        Self {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    pub message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct WireChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
