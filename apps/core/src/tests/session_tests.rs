//! Chat Service Tests
//!
//! Per-message flow: storage of both turns, auto-titling, history handling.

use std::sync::Arc;

use super::mock::MockCompletionActor;
use crate::engine::chat_pipeline::{ChatReplyPipeline, FALLBACK_REPLY};
use crate::engine::emotion::Emotion;
use crate::engine::suggestions::SuggestionPicker;
use crate::error::AppError;
use crate::models::{ConversationTurn, Role};
use crate::session::{ChatService, EMPTY_MESSAGE_REPLY, UNTITLED_CHAT};
use crate::store::{ConversationStore, InMemoryConversationStore};

struct Fixture {
    store: Arc<InMemoryConversationStore>,
    mock: Arc<MockCompletionActor>,
    service: ChatService,
}

fn fixture(mock: MockCompletionActor) -> Fixture {
    let store = Arc::new(InMemoryConversationStore::new());
    let mock = Arc::new(mock);
    let pipeline = ChatReplyPipeline::new(mock.clone(), SuggestionPicker::builtin().unwrap(), "test-model", 0.3);
    let service = ChatService::new(store.clone(), pipeline);
    Fixture { store, mock, service }
}

#[tokio::test]
async fn test_send_stores_both_turns() {
    let fx = fixture(MockCompletionActor::new("- Start with past papers"));
    let session = fx.service.create_session().await.unwrap();

    let reply = fx.service.send(&session.id, "  How do I prepare for finals?  ").await.unwrap();
    assert_eq!(reply.reply_text, "• Start with past papers");

    let history = fx.store.history(&session.id).await.unwrap();
    assert_eq!(
        history,
        vec![
            ConversationTurn::user("How do I prepare for finals?"),
            ConversationTurn::assistant("• Start with past papers"),
        ]
    );
}

#[tokio::test]
async fn test_user_turn_is_sent_once() {
    let fx = fixture(MockCompletionActor::new("- ok"));
    let session = fx.service.create_session().await.unwrap();

    fx.service.send(&session.id, "first").await.unwrap();
    fx.service.send(&session.id, "second").await.unwrap();

    let requests = fx.mock.requests();
    assert_eq!(requests.len(), 2);
    let contents: Vec<&str> = requests[1].messages.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, ["first", "• ok", "second"]);
}

#[tokio::test]
async fn test_first_message_names_the_session() {
    let fx = fixture(MockCompletionActor::new("- ok"));
    let session = fx.service.create_session().await.unwrap();
    assert_eq!(session.title.as_deref(), Some("New Chat"));

    fx.service.send(&session.id, "Explain photosynthesis in plants please").await.unwrap();
    let named = fx.store.session(&session.id).await.unwrap();
    assert_eq!(named.title.as_deref(), Some("Explain Photosynthesis Plants Please"));

    fx.service.send(&session.id, "and respiration?").await.unwrap();
    let unchanged = fx.store.session(&session.id).await.unwrap();
    assert_eq!(unchanged.title, named.title);
}

#[tokio::test]
async fn test_empty_message_short_circuits() {
    let fx = fixture(MockCompletionActor::new("- unused"));
    let session = fx.service.create_session().await.unwrap();

    let reply = fx.service.send(&session.id, " \n\t ").await.unwrap();
    assert_eq!(reply.reply_text, EMPTY_MESSAGE_REPLY);
    assert!(reply.suggestions.is_empty());
    assert!(fx.mock.requests().is_empty());
    assert!(fx.store.history(&session.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fallback_reply_is_stored() {
    let fx = fixture(MockCompletionActor::failing());
    let session = fx.service.create_session().await.unwrap();

    let reply = fx.service.send(&session.id, "hello").await.unwrap();
    assert_eq!(reply.reply_text, FALLBACK_REPLY);

    let history = fx.store.history(&session.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_emotion_recorded_on_user_turn() {
    let fx = fixture(MockCompletionActor::new("- breathe"));
    let session = fx.service.create_session().await.unwrap();

    fx.service.send(&session.id, "I feel overwhelmed").await.unwrap();
    let stored = fx.store.stored_turns(&session.id).await.unwrap();

    let user_emotion = stored[0].emotion.expect("user turn carries an emotion");
    assert_eq!(user_emotion.emotion, Emotion::Stressed);
    assert!(stored[1].emotion.is_none());
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let fx = fixture(MockCompletionActor::new("- ok"));
    let err = fx.service.send("missing", "hello").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(fx.mock.requests().is_empty());
}

#[tokio::test]
async fn test_rename() {
    let fx = fixture(MockCompletionActor::new("- ok"));
    let session = fx.service.create_session().await.unwrap();

    let renamed = fx.service.rename(&session.id, "   ").await.unwrap();
    assert_eq!(renamed.title.as_deref(), Some(UNTITLED_CHAT));

    let renamed = fx.service.rename(&session.id, &"a".repeat(300)).await.unwrap();
    assert_eq!(renamed.title.map(|t| t.len()), Some(120));
}
