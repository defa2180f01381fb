//! Exam guide schema and its rendering.
//!
//! The model is asked for a JSON object with six fixed keys, each holding a
//! list of short strings. [`ExamGuide::from_value`] validates that object and
//! [`ExamGuide::render`] turns it into the report shown to the student.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::bullets::BULLET;
use crate::error::AppError;

/// The six sections of an exam guide, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamSection {
    ImportantTopics,
    MostAskedQuestions,
    ScoringStrategy,
    EasyScoringAreas,
    StudyPlan,
    ExamWritingTips,
}

impl ExamSection {
    pub const ALL: [ExamSection; 6] = [
        ExamSection::ImportantTopics,
        ExamSection::MostAskedQuestions,
        ExamSection::ScoringStrategy,
        ExamSection::EasyScoringAreas,
        ExamSection::StudyPlan,
        ExamSection::ExamWritingTips,
    ];

    /// Key used in the JSON contract.
    pub fn key(&self) -> &'static str {
        match self {
            ExamSection::ImportantTopics => "IMPORTANT_TOPICS",
            ExamSection::MostAskedQuestions => "MOST_ASKED_QUESTIONS",
            ExamSection::ScoringStrategy => "SCORING_STRATEGY",
            ExamSection::EasyScoringAreas => "EASY_SCORING_AREAS",
            ExamSection::StudyPlan => "STUDY_PLAN",
            ExamSection::ExamWritingTips => "EXAM_WRITING_TIPS",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ExamSection::ImportantTopics => "Important Topics",
            ExamSection::MostAskedQuestions => "Most Asked Questions",
            ExamSection::ScoringStrategy => "Scoring Strategy",
            ExamSection::EasyScoringAreas => "Easy Scoring Areas",
            ExamSection::StudyPlan => "Study Plan",
            ExamSection::ExamWritingTips => "Exam Writing Tips",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ExamSection::ImportantTopics => "📌",
            ExamSection::MostAskedQuestions => "❓",
            ExamSection::ScoringStrategy => "🎯",
            ExamSection::EasyScoringAreas => "✅",
            ExamSection::StudyPlan => "🗓️",
            ExamSection::ExamWritingTips => "✍️",
        }
    }
}

impl fmt::Display for ExamSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.title())
    }
}

/// A parsed exam guide. All six sections are always present.
///
/// Deserializing goes through [`ExamGuide::from_value`], so a partial object
/// is rejected the same way a partial completion is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ExamGuide {
    sections: Vec<(ExamSection, Vec<String>)>,
}

impl ExamGuide {
    /// Builds a guide from items listed in [`ExamSection::ALL`] order.
    pub fn new(items: [Vec<String>; 6]) -> Self {
        Self {
            sections: ExamSection::ALL.into_iter().zip(items).collect(),
        }
    }

    /// Validates a JSON value against the six-section contract.
    ///
    /// The value must be an object holding every section key with an array
    /// of strings. Keys outside the contract are ignored.
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        let object = value.as_object().ok_or_else(|| {
            AppError::MalformedCompletion(format!(
                "exam guide must be a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        let mut sections = Vec::with_capacity(ExamSection::ALL.len());
        for section in ExamSection::ALL {
            let entry = object.get(section.key()).ok_or_else(|| {
                AppError::MalformedCompletion(format!("missing section {}", section.key()))
            })?;
            let list = entry.as_array().ok_or_else(|| {
                AppError::MalformedCompletion(format!(
                    "section {} must be an array, got {}",
                    section.key(),
                    json_kind(entry)
                ))
            })?;
            let items = list
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        AppError::MalformedCompletion(format!(
                            "item {} of section {} must be a string, got {}",
                            i,
                            section.key(),
                            json_kind(item)
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            sections.push((section, items));
        }

        for key in object.keys() {
            if !ExamSection::ALL.iter().any(|s| s.key() == key) {
                debug!("Ignoring unexpected exam guide key {}", key);
            }
        }

        Ok(Self { sections })
    }

    /// Parses the text of a completion as an exam guide.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(strip_code_fence(raw))?;
        Self::from_value(&value)
    }

    pub fn items(&self, section: ExamSection) -> &[String] {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default()
    }

    /// Renders the report: a titled block per section, one bullet per item,
    /// blocks separated by a blank line. Item order is kept as given.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for (section, items) in &self.sections {
            lines.push(section.to_string());
            lines.extend(
                items
                    .iter()
                    .map(|item| flatten_item(item))
                    .filter(|item| !item.is_empty())
                    .map(|item| format!("{}{}", BULLET, item)),
            );
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

impl TryFrom<Value> for ExamGuide {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// One item on one line: inner line breaks collapse to single spaces.
fn flatten_item(item: &str) -> String {
    item.lines()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validates and renders a JSON exam guide in one step.
pub fn format_exam_guide(value: &Value) -> Result<String, AppError> {
    ExamGuide::from_value(value).map(|guide| guide.render())
}

/// Removes a surrounding Markdown code fence (```` ```json ... ``` ````), if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
