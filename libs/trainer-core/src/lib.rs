//! Core training engine for the vocabulary trainer.
//!
//! Provides:
//! - SM-2-style review scheduling (`ReviewScheduler`)
//! - Next-word selection with multiple-choice distractors
//! - Pure analytics computations (accuracy, streak, weak words)
//! - Shared domain types (Word, TrainingSession, AnswerEvent, ...)

pub mod scheduler;
pub mod selector;
pub mod stats;
pub mod types;

pub use scheduler::ReviewScheduler;
pub use selector::{candidate_pool, next_prompt, Prompt, Selection};
pub use stats::{accuracy, streak, weak_words, UserStatistics, WeakWord};
pub use types::{
    AnswerEvent, Difficulty, Direction, InvalidDifficulty, Mode, ReviewState, TrainingSession,
    Word,
};
