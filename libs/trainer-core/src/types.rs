//! Core types for the vocabulary trainer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Training mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Flashcards,
    Quiz,
    Typing,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Flashcards
    }
}

impl Mode {
    /// Storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
            Self::Typing => "typing",
        }
    }

    /// Create from storage identifier.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "flashcards" => Some(Self::Flashcards),
            "quiz" => Some(Self::Quiz),
            "typing" => Some(Self::Typing),
            _ => None,
        }
    }
}

/// Which side of a word is shown and which is expected as the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Show `term`, expect `translation`.
    TermToTranslation,
    /// Show `translation`, expect `term`.
    TranslationToTerm,
}

impl Default for Direction {
    fn default() -> Self {
        Self::TermToTranslation
    }
}

impl Direction {
    /// Storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TermToTranslation => "term_to_translation",
            Self::TranslationToTerm => "translation_to_term",
        }
    }

    /// Create from storage identifier.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "term_to_translation" => Some(Self::TermToTranslation),
            "translation_to_term" => Some(Self::TranslationToTerm),
            _ => None,
        }
    }
}

/// Word difficulty grade (1 = easy, 3 = hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

/// Difficulty outside the 1..=3 range.
#[derive(Debug, Error)]
#[error("difficulty must be between 1 and 3, got {0}")]
pub struct InvalidDifficulty(pub u8);

impl Difficulty {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=3).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidDifficulty(value))
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> u8 {
        difficulty.0
    }
}

/// Review scheduling state carried by every word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub repetitions: u32,
    pub easiness: f64,
    pub interval_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            repetitions: 0,
            easiness: 2.5,
            interval_days: 1,
            last_reviewed: None,
            next_review: None,
        }
    }
}

impl ReviewState {
    /// A word is due when it has never been scheduled or its review
    /// time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review {
            None => true,
            Some(next) => next <= now,
        }
    }
}

/// A vocabulary entry inside a dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub dictionary_id: i64,
    pub term: String,
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub difficulty: Difficulty,
    #[serde(flatten)]
    pub review: ReviewState,
}

impl Word {
    /// Text shown to the learner for the given direction.
    pub fn prompt_text(&self, direction: Direction) -> &str {
        match direction {
            Direction::TermToTranslation => &self.term,
            Direction::TranslationToTerm => &self.translation,
        }
    }

    /// Text expected as the answer for the given direction.
    pub fn answer_text(&self, direction: Direction) -> &str {
        match direction {
            Direction::TermToTranslation => &self.translation,
            Direction::TranslationToTerm => &self.term,
        }
    }
}

/// One run through a dictionary by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: i64,
    pub user_id: i64,
    pub dictionary_id: i64,
    pub mode: Mode,
    pub direction: Direction,
    /// 1-based sequence number of this session within the user's history.
    pub local_number: i64,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl TrainingSession {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// Immutable record of a single answer within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub id: i64,
    pub session_id: i64,
    pub word_id: i64,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    pub created_at: DateTime<Utc>,
}
