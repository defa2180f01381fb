//! # Engine Module
//!
//! Post-processing of model output and the two request pipelines.
//!
//! ## Components
//! - `topics`: keyword topic classification
//! - `suggestions`: follow-up prompt sampling per topic
//! - `bullets`: bullet-list normalization (chat and exam variants)
//! - `exam_guide`: six-section exam guide schema and rendering
//! - `emotion`: keyword emotion detection for user messages
//! - `title`: chat titles from the first message
//! - `chat_pipeline`: completion + normalization + suggestions, with fallback
//! - `exam_pipeline`: JSON-constrained completion + schema parse + render

pub mod bullets;
pub mod chat_pipeline;
pub mod emotion;
pub mod exam_guide;
pub mod exam_pipeline;
pub mod suggestions;
pub mod title;
pub mod topics;

pub use bullets::{normalize, normalize_chat_reply, normalize_exam_text, NormalizeMode};
pub use chat_pipeline::ChatReplyPipeline;
pub use emotion::{detect_emotion, Emotion, EmotionReading};
pub use exam_guide::{format_exam_guide, ExamGuide, ExamSection};
pub use exam_pipeline::ExamGuidePipeline;
pub use suggestions::SuggestionPicker;
pub use title::make_title;
pub use topics::{Category, TopicClassifier};
