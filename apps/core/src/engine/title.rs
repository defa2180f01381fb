//! Chat titles derived from the first user message.

use regex::Regex;
use std::sync::LazyLock;

/// Title used when nothing usable is left of the message.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Upper bound on stored titles, in characters.
pub const MAX_TITLE_CHARS: usize = 120;

pub const DEFAULT_TITLE_WORDS: usize = 4;

const STOPWORDS: &[&str] = &[
    "i", "me", "my", "we", "our", "you", "your", "the", "a", "an", "and", "or", "but", "to", "for",
    "of", "in", "on", "is", "are", "was", "were", "this", "that", "these", "those", "with", "by",
    "from", "at", "be", "as", "it's", "its",
];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z\s]").expect("Invalid regex: non-word characters"));

/// Builds a short title from free text, e.g. "How do I solve quadratic
/// equations?" becomes "How Do Solve Quadratic".
pub fn make_title(text: &str, max_words: usize) -> String {
    let cleaned = NON_WORD.replace_all(text, " ").to_lowercase();
    let all_words: Vec<&str> = cleaned.split_whitespace().collect();

    let mut words: Vec<&str> = all_words
        .iter()
        .copied()
        .filter(|w| !STOPWORDS.contains(w))
        .collect();
    if words.is_empty() {
        words = all_words;
    }

    let title = words
        .into_iter()
        .take(max_words)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

/// Trims a title and cuts it to [`MAX_TITLE_CHARS`] characters.
pub fn truncate_title(title: &str) -> String {
    title.trim().chars().take(MAX_TITLE_CHARS).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
