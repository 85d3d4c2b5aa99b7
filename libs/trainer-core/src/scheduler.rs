//! SM-2-style review scheduling.
//!
//! A single continuous formula owns easiness, interval and next-review
//! time for every word; answer correctness is the only input.

use chrono::{DateTime, Duration, Utc};

use crate::types::ReviewState;

/// Review scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct ReviewScheduler {
    pub initial_easiness: f64,
    pub minimum_easiness: f64,
    /// Subtracted from easiness on a wrong answer.
    pub wrong_penalty: f64,
    /// Added to easiness on a correct answer.
    pub correct_bonus: f64,
    /// Interval after the first correct answer (and after any wrong one).
    pub first_interval_days: i64,
    /// Interval after the second consecutive correct answer.
    pub second_interval_days: i64,
}

impl Default for ReviewScheduler {
    fn default() -> Self {
        Self {
            initial_easiness: 2.5,
            minimum_easiness: 1.3,
            wrong_penalty: 0.2,
            correct_bonus: 0.1,
            first_interval_days: 1,
            second_interval_days: 6,
        }
    }
}

impl ReviewScheduler {
    /// State for a word that has never been reviewed.
    pub fn initial_state(&self) -> ReviewState {
        ReviewState {
            easiness: self.initial_easiness,
            ..ReviewState::default()
        }
    }

    /// Calculate the review state after an answer.
    ///
    /// Wrong answers reset the repetition streak and shrink easiness,
    /// floored at `minimum_easiness`. Correct answers grow the interval:
    /// fixed steps for the first two repetitions, then the current
    /// interval stretched by the easiness factor.
    pub fn update(&self, state: &ReviewState, correct: bool, now: DateTime<Utc>) -> ReviewState {
        let (repetitions, easiness, interval_days) = if correct {
            let interval = match state.repetitions {
                0 => self.first_interval_days,
                1 => self.second_interval_days,
                _ => (state.interval_days as f64 * state.easiness).round() as i64,
            };
            (
                state.repetitions + 1,
                state.easiness + self.correct_bonus,
                interval,
            )
        } else {
            (
                0,
                (state.easiness - self.wrong_penalty).max(self.minimum_easiness),
                self.first_interval_days,
            )
        };

        ReviewState {
            repetitions,
            easiness,
            interval_days,
            last_reviewed: Some(now),
            next_review: Some(now + Duration::days(interval_days)),
        }
    }
}
