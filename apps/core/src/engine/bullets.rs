//! Bullet-list normalization of model output.
//!
//! Both the chat reply and the free-text exam guide go through the same
//! rules; [`NormalizeMode`] only switches on the parts that differ between
//! them. Output lines either start with [`BULLET`] or, in exam mode, with
//! [`HEADING_MARKER`]. Normalizing already-normalized text is a no-op.

use regex::Regex;
use std::sync::LazyLock;

/// Canonical bullet prefix.
pub const BULLET: &str = "• ";

/// Prefix of section heading lines.
pub const HEADING_MARKER: &str = "📌 ";

/// Section titles the exam guide model tends to inline into paragraphs.
pub const EXAM_SECTION_HEADERS: [&str; 6] = [
    "IMPORTANT TOPICS",
    "MOST ASKED QUESTIONS",
    "SCORING STRATEGY",
    "EASY SCORING AREAS",
    "STUDY PLAN",
    "EXAM WRITING TIPS",
];

const MAX_HEADING_WORDS: usize = 4;

// NOTE: expect() is acceptable for a constant pattern compiled once
static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)] ").expect("Invalid regex: ordered list marker"));

/// Which call site the text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Chat replies: `* ` counts as a bullet, no heading detection.
    ChatReply,
    /// Free-text exam guides: known section headers are split onto their own
    /// line and short all-caps lines become headings.
    ExamGuide,
}

impl NormalizeMode {
    fn detects_headings(self) -> bool {
        matches!(self, NormalizeMode::ExamGuide)
    }

    fn accepts_asterisk_bullets(self) -> bool {
        matches!(self, NormalizeMode::ChatReply)
    }

    fn section_headers(self) -> &'static [&'static str] {
        match self {
            NormalizeMode::ChatReply => &[],
            NormalizeMode::ExamGuide => &EXAM_SECTION_HEADERS,
        }
    }
}

/// Normalize line-oriented text into bullets (and headings, in exam mode).
pub fn normalize(text: &str, mode: NormalizeMode) -> String {
    let mut out: Vec<String> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        for segment in split_section_headers(line, mode.section_headers()) {
            if let Some(normalized) = normalize_line(segment, mode) {
                out.push(normalized);
            }
        }
    }

    out.join("\n")
}

/// Chat reply variant of [`normalize`].
pub fn normalize_chat_reply(text: &str) -> String {
    normalize(text, NormalizeMode::ChatReply)
}

/// Exam guide variant of [`normalize`].
pub fn normalize_exam_text(text: &str) -> String {
    normalize(text, NormalizeMode::ExamGuide)
}

fn normalize_line(line: &str, mode: NormalizeMode) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with(BULLET) || (mode.detects_headings() && line.starts_with(HEADING_MARKER)) {
        return Some(line.to_string());
    }

    if mode.detects_headings() && is_heading(line) {
        return Some(format!("{}{}", HEADING_MARKER, line));
    }

    if let Some(rest) = line.strip_prefix("- ") {
        return Some(bulleted(rest));
    }

    if mode.accepts_asterisk_bullets() {
        if let Some(rest) = line.strip_prefix("* ") {
            return Some(bulleted(rest));
        }
    }

    if let Some(marker) = ORDERED_MARKER.find(line) {
        return Some(bulleted(&line[marker.end()..]));
    }

    Some(bulleted(line))
}

fn bulleted(rest: &str) -> String {
    format!("{}{}", BULLET, rest.trim_start())
}

/// A heading is one to four words made only of upper-case letters.
pub fn is_heading(line: &str) -> bool {
    let mut words = 0;
    for word in line.split_whitespace() {
        words += 1;
        if words > MAX_HEADING_WORDS {
            return false;
        }
        if !word.chars().all(|c| c.is_alphabetic() && c.is_uppercase()) {
            return false;
        }
    }
    words > 0
}

/// Puts every known section header found inside `line` on its own segment.
///
/// Lines that already carry the heading marker are left whole.
fn split_section_headers<'a>(line: &'a str, headers: &[&str]) -> Vec<&'a str> {
    if headers.is_empty() || line.starts_with(HEADING_MARKER) {
        return vec![line];
    }

    let mut segments = Vec::new();
    let mut rest = line;
    while let Some((pos, header)) = headers
        .iter()
        .filter_map(|h| rest.find(h).map(|pos| (pos, *h)))
        .min_by_key(|(pos, _)| *pos)
    {
        segments.push(&rest[..pos]);
        segments.push(&rest[pos..pos + header.len()]);
        rest = &rest[pos + header.len()..];
    }
    segments.push(rest);

    segments.retain(|s| !s.trim().is_empty());
    segments
}
