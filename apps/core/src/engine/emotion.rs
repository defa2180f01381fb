//! Keyword-based emotion detection for user messages.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Crisis,
    Stressed,
    Anxious,
    Sad,
    Angry,
    Lonely,
    Happy,
    Neutral,
}

impl Emotion {
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Crisis => "crisis",
            Emotion::Stressed => "stressed",
            Emotion::Anxious => "anxious",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Lonely => "lonely",
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of emotion detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    pub emotion: Emotion,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Set only for crisis phrases
    pub is_crisis: bool,
}

const CRISIS_PHRASES: &[&str] = &[
    "i want to die",
    "kill myself",
    "suicide",
    "i'll kill myself",
    "i can't go on",
];

/// Checked in order, first hit wins.
const EMOTION_KEYWORDS: &[(Emotion, f32, &[&str])] = &[
    (Emotion::Stressed, 0.85, &["stressed", "stress", "overwhelmed", "pressure"]),
    (Emotion::Anxious, 0.8, &["anxious", "anxiety", "panic", "worried"]),
    (Emotion::Sad, 0.8, &["sad", "depressed", "unhappy", "down"]),
    (Emotion::Angry, 0.8, &["angry", "mad", "furious"]),
    (Emotion::Lonely, 0.75, &["alone", "lonely", "isolated"]),
    (Emotion::Happy, 0.9, &["happy", "great", "good", "awesome"]),
];

pub fn detect_emotion(text: &str) -> EmotionReading {
    let text_lower = text.to_lowercase();

    if CRISIS_PHRASES.iter().any(|p| text_lower.contains(p)) {
        return EmotionReading {
            emotion: Emotion::Crisis,
            confidence: 1.0,
            is_crisis: true,
        };
    }

    EMOTION_KEYWORDS
        .iter()
        .find(|(_, _, words)| words.iter().any(|w| text_lower.contains(w)))
        .map(|(emotion, confidence, _)| EmotionReading {
            emotion: *emotion,
            confidence: *confidence,
            is_crisis: false,
        })
        .unwrap_or(EmotionReading {
            emotion: Emotion::Neutral,
            confidence: 0.5,
            is_crisis: false,
        })
}
