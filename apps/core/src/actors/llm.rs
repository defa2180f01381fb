use crate::actors::messages::{AppError, CompletionRequest, LlmMessage, WireRequest, WireResponse};
use crate::actors::traits::CompletionActor;
use crate::config::AppConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, error, info};

// --- Constants ---
/// Extra time the handle waits beyond the HTTP timeout before giving up on the runner.
const RESPONDER_GRACE: Duration = Duration::from_secs(5);
const MAX_ERROR_BODY_CHARS: usize = 500;

/// A handle to the LLM actor.
///
/// This struct provides a public, cloneable interface for sending requests to the
/// running actor. The actor handles one request at a time, in arrival order.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    reply_timeout: Duration,
}

impl LlmActorHandle {
    /// Creates a new LLM actor and returns a handle to it.
    ///
    /// This will spawn the `LlmActorRunner` in a new Tokio task, so it must be
    /// called from within a runtime.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let (sender, receiver) = mpsc::channel(32);
        let actor = LlmActorRunner::new(receiver, config)?;
        tokio::spawn(async move { actor.run().await });
        Ok(Self {
            sender,
            reply_timeout: config.timeout() + RESPONDER_GRACE,
        })
    }
}

#[async_trait]
impl CompletionActor for LlmActorHandle {
    async fn complete_chat(&self, request: CompletionRequest) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Complete {
            request,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    completions_url: String,
    client: Client,
    auth_header: HeaderValue,
}

impl LlmActorRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, config: &AppConfig) -> Result<Self, AppError> {
        let mut auth_header = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| AppError::Config(format!("API key is not a valid header value: {}", e)))?;
        auth_header.set_sensitive(true);

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            receiver,
            completions_url: config.completions_url(),
            client,
            auth_header,
        })
    }

    async fn run(mut self) {
        info!("LlmActor started ({})", self.completions_url);

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("LlmActor stopped");
    }

    async fn handle_message(&mut self, msg: LlmMessage) {
        match msg {
            LlmMessage::Complete { request, responder } => {
                let result = self.complete(&request).await;
                if let Err(e) = &result {
                    error!("Completion request failed: {}", e);
                }
                let _ = responder.send(result);
            }
        }
    }

    fn build_request(&self, payload: &WireRequest) -> reqwest::RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());

        self.client
            .post(&self.completions_url)
            .headers(headers)
            .json(payload)
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        debug!(
            "LLM completion: model={}, {} turns, temperature={}",
            request.model,
            request.messages.len(),
            request.temperature
        );

        let payload = WireRequest::from(request);
        let res = self.build_request(&payload).send().await?;

        let status = res.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited);
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(AppError::CompletionUnavailable(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let body = res.text().await?;
        let parsed: WireResponse = serde_json::from_str(&body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AppError::MalformedCompletion(
                "completion contained no text".to_string(),
            ));
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationTurn;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_url: String) -> AppConfig {
        let mut config = AppConfig::new("test-key");
        config.api_base = format!("{}/openai/v1", server_url);
        config.timeout_secs = 2;
        config
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.1-8b-instant".to_string(),
            system_prompt: "Answer in bullets.".to_string(),
            messages: vec![
                ConversationTurn::user("hi"),
                ConversationTurn::assistant("• hello"),
                ConversationTurn::user("help me study"),
            ],
            temperature: 0.3,
            max_tokens: None,
        }
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
            ]
        })
    }

    #[tokio::test]
    async fn test_complete_chat_success() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(&test_config(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-8b-instant",
                "stream": false,
                "messages": [
                    { "role": "system", "content": "Answer in bullets." },
                    { "role": "user", "content": "hi" },
                    { "role": "assistant", "content": "• hello" },
                    { "role": "user", "content": "help me study" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("  - Plan your week\n")))
            .expect(1)
            .mount(&mock_server)
            .await;

        // 2. Act
        let result = handle.complete_chat(request()).await;

        // 3. Assert
        assert_eq!(result.unwrap(), "- Plan your week");
    }

    #[tokio::test]
    async fn test_max_tokens_is_sent_when_set() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(&test_config(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "max_tokens": 2000 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut req = request();
        req.max_tokens = Some(2000);
        assert_eq!(handle.complete_chat(req).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(&test_config(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let result = handle.complete_chat(request()).await;

        if let Err(AppError::CompletionUnavailable(err_msg)) = result {
            assert!(err_msg.contains("Completion request failed with status 500"));
            assert!(err_msg.contains("Internal Server Error"));
        } else {
            panic!("Expected AppError::CompletionUnavailable, got {:?}", result);
        }
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(&test_config(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        assert!(matches!(
            handle.complete_chat(request()).await,
            Err(AppError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(&test_config(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        assert!(matches!(
            handle.complete_chat(request()).await,
            Err(AppError::MalformedCompletion(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_choices_and_blank_content() {
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(&test_config(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
            .mount(&mock_server)
            .await;

        for _ in 0..2 {
            assert!(matches!(
                handle.complete_chat(request()).await,
                Err(AppError::MalformedCompletion(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let mock_server = MockServer::start().await;
        let mut config = test_config(mock_server.uri());
        config.timeout_secs = 1;
        let handle = LlmActorHandle::new(&config).unwrap();

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let err = handle.complete_chat(request()).await.unwrap_err();
        assert!(err.is_completion_failure(), "unexpected error {:?}", err);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let config = test_config("http://127.0.0.1:9".to_string());
        let handle = LlmActorHandle::new(&config).unwrap();

        let err = handle.complete_chat(request()).await.unwrap_err();
        assert!(err.is_completion_failure(), "unexpected error {:?}", err);
    }
}
