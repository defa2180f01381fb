//! Exam guide pipeline: JSON-constrained completion, schema parse, render.
//!
//! Unlike chat, failures are surfaced as [`GenerationError`]; nothing is
//! retried here.

use std::sync::Arc;
use tracing::{error, info, instrument};

use super::exam_guide::ExamGuide;
use crate::actors::messages::CompletionRequest;
use crate::actors::traits::CompletionActor;
use crate::error::{AppError, GenerationError};
use crate::models::ConversationTurn;

pub const EXAM_SYSTEM_PROMPT: &str = "Return ONLY JSON. No formatting mistakes.";

/// Instruction for `subject`, describing the exact JSON shape expected back.
pub fn exam_prompt(subject: &str) -> String {
    format!(
        r#"You MUST return ONLY valid JSON.
No markdown. No asterisks. No emojis. No extra text.

Return EXACTLY this structure:

{{
  "IMPORTANT_TOPICS": [
      "topic1", "topic2", "topic3", "topic4", "topic5", "topic6", "topic7"
  ],
  "MOST_ASKED_QUESTIONS": [
      "q1", "q2", "q3", "q4", "q5"
  ],
  "SCORING_STRATEGY": [
      "tip1", "tip2", "tip3", "tip4"
  ],
  "EASY_SCORING_AREAS": [
      "area1", "area2", "area3"
  ],
  "STUDY_PLAN": [
      "step1", "step2", "step3", "step4", "step5"
  ],
  "EXAM_WRITING_TIPS": [
      "tip1", "tip2", "tip3"
  ]
}}

Now generate the exam preparation guide for: {subject}.
Make the content relevant, simple, and exam-focused.
"#
    )
}

pub struct ExamGuidePipeline {
    llm: Arc<dyn CompletionActor>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ExamGuidePipeline {
    pub fn new(llm: Arc<dyn CompletionActor>, model: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    pub fn build_request(&self, subject: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system_prompt: EXAM_SYSTEM_PROMPT.to_string(),
            messages: vec![ConversationTurn::user(exam_prompt(subject))],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        }
    }

    /// Generates the guide for `subject` and returns the rendered report.
    #[instrument(skip_all)]
    pub async fn generate(&self, subject: &str) -> Result<String, GenerationError> {
        self.generate_guide(subject).await.map(|guide| guide.render())
    }

    /// Same as [`generate`](Self::generate) but returns the parsed guide.
    pub async fn generate_guide(&self, subject: &str) -> Result<ExamGuide, GenerationError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(AppError::Validation("Please enter a subject".to_string()).into());
        }

        info!(subject_len = subject.len(), "Generating exam guide");
        let raw = self
            .llm
            .complete_chat(self.build_request(subject))
            .await
            .inspect_err(|e| error!("Exam guide completion failed: {}", e))?;

        let guide = ExamGuide::parse(&raw).inspect_err(|e| error!("Exam guide was not usable: {}", e))?;
        info!("Exam guide parsed");
        Ok(guide)
    }
}
