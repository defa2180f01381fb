use crate::actors::messages::{AppError, CompletionRequest};
use async_trait::async_trait;

/// Defines the public interface for the chat-completion collaborator.
///
/// This trait abstracts the hosted language model, allowing the pipelines to
/// run against the real HTTP client or against a test double.
#[async_trait]
pub trait CompletionActor: Send + Sync + 'static {
    /// Sends one chat-completion request and returns the raw reply text.
    async fn complete_chat(&self, request: CompletionRequest) -> Result<String, AppError>;
}
