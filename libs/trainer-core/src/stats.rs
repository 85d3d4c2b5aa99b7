//! Pure analytics computations over answer events.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{AnswerEvent, Word};

/// Repetition count at which a word counts as learned.
pub const LEARNED_REPETITIONS: u32 = 4;

/// Weak-word limit for a session report.
pub const WEAK_WORDS_LIMIT: usize = 10;

/// Hardest-word limit for user statistics.
pub const TOP_HARD_LIMIT: usize = 5;

/// A word together with its incorrect-answer count within some scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakWord {
    #[serde(flatten)]
    pub word: Word,
    pub mistakes: u32,
}

/// Aggregate statistics across a user's whole history.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatistics {
    pub total_words: i64,
    /// Words with at least [`LEARNED_REPETITIONS`] repetitions.
    pub learned: i64,
    /// Words due for review right now.
    pub due: i64,
    pub correct_total: i64,
    pub wrong_total: i64,
    /// Rounded percentage of correct answers, 0 when nothing answered.
    pub accuracy: u32,
    /// Consecutive correct answers ending at the most recent event.
    pub streak: u64,
    pub top_hard: Vec<WeakWord>,
}

/// Rounded percentage of correct answers; 0 when nothing was answered.
pub fn accuracy(correct: i64, wrong: i64) -> u32 {
    let total = correct + wrong;
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Consecutive correct answers walking backward from the most recent
/// event until the first wrong one. `events` must be in creation order.
pub fn streak(events: &[AnswerEvent]) -> u64 {
    events.iter().rev().take_while(|e| e.correct).count() as u64
}

/// Words with at least one incorrect event, ordered by mistake count
/// descending and truncated to `limit`. Ties keep dictionary order.
pub fn weak_words(words: &[Word], events: &[AnswerEvent], limit: usize) -> Vec<WeakWord> {
    let mut mistakes: HashMap<i64, u32> = HashMap::new();
    for event in events.iter().filter(|e| !e.correct) {
        *mistakes.entry(event.word_id).or_insert(0) += 1;
    }

    let mut weak: Vec<WeakWord> = words
        .iter()
        .filter_map(|word| {
            mistakes.get(&word.id).map(|&count| WeakWord {
                word: word.clone(),
                mistakes: count,
            })
        })
        .collect();
    weak.sort_by(|a, b| b.mistakes.cmp(&a.mistakes));
    weak.truncate(limit);
    weak
}
