//! Next-word selection and multiple-choice option building.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::types::{Direction, Word};

/// Cap applied to each candidate tier.
pub const TIER_CAP: usize = 20;

/// Wrong options sampled per prompt.
pub const DISTRACTOR_COUNT: usize = 3;

/// A multiple-choice question for one word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
    pub word_id: i64,
    /// Text shown to the learner.
    pub prompt: String,
    pub correct_answer: String,
    /// Correct answer plus distractors, uniformly shuffled.
    pub options: Vec<String>,
}

/// Outcome of asking for the next word in a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Every word in the dictionary has been answered this session.
    Done,
    Prompt(Prompt),
}

/// Pick the next prompt for a session.
///
/// `words` is the full dictionary; `answered` holds word ids already
/// answered this session. Returns [`Selection::Done`] once nothing is
/// left to ask.
pub fn next_prompt<R: Rng>(
    words: &[Word],
    answered: &HashSet<i64>,
    direction: Direction,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Selection {
    let candidates = candidate_pool(words, answered, now);
    match candidates.choose(rng) {
        Some(chosen) => Selection::Prompt(build_prompt(chosen, words, direction, rng)),
        None => Selection::Done,
    }
}

/// Candidate pool for the next prompt.
///
/// Three tiers consulted in order, each excluding already-answered
/// words and capped at [`TIER_CAP`]: due words, then unseen words
/// (zero repetitions), then anything remaining. The first non-empty
/// tier wins.
pub fn candidate_pool<'a>(
    words: &'a [Word],
    answered: &HashSet<i64>,
    now: DateTime<Utc>,
) -> Vec<&'a Word> {
    let remaining = || words.iter().filter(|w| !answered.contains(&w.id));

    let due: Vec<&Word> = remaining()
        .filter(|w| w.review.is_due(now))
        .take(TIER_CAP)
        .collect();
    if !due.is_empty() {
        return due;
    }

    let unseen: Vec<&Word> = remaining()
        .filter(|w| w.review.repetitions == 0)
        .take(TIER_CAP)
        .collect();
    if !unseen.is_empty() {
        return unseen;
    }

    remaining().take(TIER_CAP).collect()
}

/// Build the question for a chosen word: direction-mapped prompt and
/// answer, plus up to [`DISTRACTOR_COUNT`] distractors drawn from the
/// rest of the dictionary. Option texts are distinct, so the correct
/// answer appears exactly once.
fn build_prompt<R: Rng>(
    chosen: &Word,
    words: &[Word],
    direction: Direction,
    rng: &mut R,
) -> Prompt {
    let correct_answer = chosen.answer_text(direction).to_string();

    let mut pool: Vec<&Word> = words.iter().filter(|w| w.id != chosen.id).collect();
    pool.shuffle(rng);

    let mut options = vec![correct_answer.clone()];
    for word in pool {
        if options.len() > DISTRACTOR_COUNT {
            break;
        }
        let text = word.answer_text(direction);
        if options.iter().any(|existing| existing == text) {
            continue;
        }
        options.push(text.to_string());
    }
    options.shuffle(rng);

    Prompt {
        word_id: chosen.id,
        prompt: chosen.prompt_text(direction).to_string(),
        correct_answer,
        options,
    }
}
