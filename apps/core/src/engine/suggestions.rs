//! Canned follow-up prompts, sampled per category.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::topics::Category;
use crate::error::AppError;

/// Number of suggestions returned for every reply.
pub const SUGGESTION_COUNT: usize = 3;

const DEFAULT_SUGGESTIONS: &[(Category, &[&str])] = &[
    (
        Category::Study,
        &["Create study timetable", "Memory tricks", "Explain topic"],
    ),
    (
        Category::Exam,
        &["3-day revision plan", "High-yield topics", "Exam strategy"],
    ),
    (
        Category::Stress,
        &["Breathing exercise", "Relax routine", "Fix workload"],
    ),
    (
        Category::Coding,
        &["Debug code", "Explain logic", "Give example code"],
    ),
    (
        Category::General,
        &["Tell me more", "Help me plan", "Quick tips"],
    ),
];

/// Samples follow-up prompts from a validated category table.
#[derive(Debug, Clone)]
pub struct SuggestionPicker {
    table: HashMap<Category, Vec<String>>,
}

impl SuggestionPicker {
    /// The built-in suggestion table.
    ///
    /// Fails only if the table itself is defective; call this at startup.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_table(
            DEFAULT_SUGGESTIONS
                .iter()
                .map(|(category, items)| (*category, items.iter().map(|s| s.to_string()).collect())),
        )
    }

    /// Builds a picker from an arbitrary table.
    ///
    /// Every listed category must hold at least [`SUGGESTION_COUNT`] distinct
    /// entries, and `General` must be present since it is the fallback list.
    pub fn from_table<I>(entries: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (Category, Vec<String>)>,
    {
        let mut table = HashMap::new();
        for (category, items) in entries {
            let mut seen = HashSet::new();
            let distinct: Vec<String> = items
                .into_iter()
                .filter(|item| seen.insert(item.clone()))
                .collect();
            if distinct.len() < SUGGESTION_COUNT {
                return Err(AppError::Config(format!(
                    "suggestion list for '{}' has {} distinct entries, need at least {}",
                    category,
                    distinct.len(),
                    SUGGESTION_COUNT
                )));
            }
            table.insert(category, distinct);
        }

        if !table.contains_key(&Category::General) {
            return Err(AppError::Config(
                "suggestion table has no 'general' list".to_string(),
            ));
        }

        Ok(Self { table })
    }

    /// Three distinct suggestions for `category`, in random order.
    pub fn suggest(&self, category: Category) -> Vec<String> {
        self.suggest_with_rng(category, &mut rand::thread_rng())
    }

    /// Like [`suggest`](Self::suggest) with a caller-supplied random source.
    pub fn suggest_with_rng<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> Vec<String> {
        let mut pool = self.list_for(category).to_vec();
        pool.shuffle(rng);
        pool.truncate(SUGGESTION_COUNT);
        pool
    }

    /// Suggestions for a category given by name; unknown names use `general`.
    pub fn suggest_for_label<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> Vec<String> {
        let category = label.parse::<Category>().unwrap_or_else(|e| {
            debug!("{}, using general suggestions", e);
            Category::General
        });
        self.suggest_with_rng(category, rng)
    }

    /// The canned list for a category, or the `general` list if it has none.
    pub fn list_for(&self, category: Category) -> &[String] {
        self.table
            .get(&category)
            .or_else(|| self.table.get(&Category::General))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
