//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from trainer-core
pub use trainer_core::selector::Prompt;
pub use trainer_core::stats::{UserStatistics, WeakWord};
pub use trainer_core::types::{
    AnswerEvent, Difficulty, Direction, Mode, ReviewState, TrainingSession, Word,
};

// === Database Entity Types ===

/// Registered user. Not serialized directly; the token is a credential.
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Dictionary owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dictionary {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Word row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbWord {
    pub id: i64,
    pub dictionary_id: i64,
    pub term: String,
    pub translation: String,
    pub transcription: Option<String>,
    pub example: Option<String>,
    pub difficulty: i16,
    pub repetitions: i32,
    pub easiness: f64,
    pub interval_days: i64,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DbWord {
    /// Convert to the core word type
    pub fn to_word(&self) -> Word {
        Word {
            id: self.id,
            dictionary_id: self.dictionary_id,
            term: self.term.clone(),
            translation: self.translation.clone(),
            transcription: self.transcription.clone(),
            example: self.example.clone(),
            difficulty: Difficulty::try_from(self.difficulty as u8).unwrap_or_default(),
            review: self.review_state(),
        }
    }

    /// Review scheduling fields as the core state
    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            repetitions: self.repetitions.max(0) as u32,
            easiness: self.easiness,
            interval_days: self.interval_days,
            last_reviewed: self.last_reviewed,
            next_review: self.next_review,
        }
    }
}

/// Training session row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbSession {
    pub id: i64,
    pub user_id: i64,
    pub dictionary_id: i64,
    pub mode: String,
    pub direction: String,
    pub local_number: i64,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl DbSession {
    /// Convert to the core session type
    pub fn to_session(&self) -> TrainingSession {
        TrainingSession {
            id: self.id,
            user_id: self.user_id,
            dictionary_id: self.dictionary_id,
            mode: Mode::from_str(&self.mode).unwrap_or_default(),
            direction: Direction::from_str(&self.direction).unwrap_or_default(),
            local_number: self.local_number,
            correct_count: self.correct_count,
            wrong_count: self.wrong_count,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Answer row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbAnswer {
    pub id: i64,
    pub session_id: i64,
    pub word_id: i64,
    pub correct: bool,
    pub user_answer: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbAnswer {
    /// Convert to the core answer event
    pub fn to_event(&self) -> AnswerEvent {
        AnswerEvent {
            id: self.id,
            session_id: self.session_id,
            word_id: self.word_id,
            correct: self.correct,
            user_answer: self.user_answer.clone(),
            created_at: self.created_at,
        }
    }
}

/// Word row joined with its all-time mistake count
#[derive(Debug, Clone, FromRow)]
pub struct DbWeakWord {
    #[sqlx(flatten)]
    pub word: DbWord,
    pub mistakes: i64,
}

impl DbWeakWord {
    /// Convert to the core weak-word type
    pub fn to_weak_word(&self) -> WeakWord {
        WeakWord {
            word: self.word.to_word(),
            mistakes: self.mistakes.max(0) as u32,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDictionaryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateDictionaryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryListResponse {
    pub dictionaries: Vec<Dictionary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWordRequest {
    pub dictionary_id: i64,
    pub term: String,
    pub translation: String,
    pub transcription: Option<String>,
    pub example: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateWordRequest {
    pub term: Option<String>,
    pub translation: Option<String>,
    pub transcription: Option<String>,
    pub example: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordListResponse {
    pub words: Vec<Word>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartTrainingRequest {
    pub dictionary_id: i64,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct StartTrainingResponse {
    pub session: TrainingSession,
    /// False when an existing open session was resumed.
    pub created: bool,
}

/// Next-word payload: a prompt, or completion once every word in the
/// dictionary has been answered this session.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NextWordResponse {
    Done { done: bool },
    Prompt(Prompt),
}

impl NextWordResponse {
    pub fn done() -> Self {
        Self::Done { done: true }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordAnswerRequest {
    pub word_id: i64,
    pub correct: bool,
    pub user_answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordAnswerResponse {
    pub recorded: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub sessions: Vec<TrainingSession>,
}

/// An answer event joined with the current state of its word.
///
/// Word fields are read at query time, not frozen at answer time.
#[derive(Debug, Serialize)]
pub struct AnswerDetail {
    #[serde(flatten)]
    pub event: AnswerEvent,
    pub word: Word,
}

#[derive(Debug, Serialize)]
pub struct SessionDetailsResponse {
    #[serde(flatten)]
    pub session: TrainingSession,
    pub answers: Vec<AnswerDetail>,
}

#[derive(Debug, Serialize)]
pub struct WeakWordsResponse {
    pub weak_words: Vec<WeakWord>,
}
