//! Topic detection for follow-up suggestions.
//!
//! Plain lower-cased substring matching against a small keyword table.
//! Categories are checked in a fixed order and the first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse topic of a user message. Derived per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Exam,
    Stress,
    Coding,
    General,
}

impl Category {
    /// All categories, `General` last.
    pub const ALL: [Category; 5] = [
        Category::Study,
        Category::Exam,
        Category::Stress,
        Category::Coding,
        Category::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Study => "study",
            Category::Exam => "exam",
            Category::Stress => "stress",
            Category::Coding => "coding",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Keyword table in precedence order. `General` has no keywords.
const TOPIC_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Study, &["study", "learn", "syllabus", "notes"]),
    (Category::Exam, &["exam", "test", "marks", "result", "prepare"]),
    (Category::Stress, &["stress", "pressure", "overwhelmed", "tired"]),
    (Category::Coding, &["python", "code", "debug", "error", "logic"]),
];

/// Keyword-based topic classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct TopicClassifier;

impl TopicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify free text. Total: empty or unmatched input yields `General`.
    pub fn classify(&self, text: &str) -> Category {
        let text_lower = text.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| text_lower.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::General)
    }
}
