//! Training orchestration: session lifecycle, prompts, answer
//! recording and analytics views.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use trainer_core::scheduler::ReviewScheduler;
use trainer_core::selector::{next_prompt, Selection};
use trainer_core::stats::{self, TOP_HARD_LIMIT, WEAK_WORDS_LIMIT};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::lock::SessionLocks;

/// Training engine wired to the database.
pub struct TrainingService {
    db: Arc<Database>,
    locks: SessionLocks,
    scheduler: ReviewScheduler,
    rng: Mutex<StdRng>,
}

impl TrainingService {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_rng(db, StdRng::from_entropy())
    }

    /// Construct with a caller-supplied RNG; seed it for deterministic
    /// prompts in tests.
    pub fn with_rng(db: Arc<Database>, rng: StdRng) -> Self {
        Self {
            db,
            locks: SessionLocks::new(),
            scheduler: ReviewScheduler::default(),
            rng: Mutex::new(rng),
        }
    }

    /// Start a session for a dictionary, or resume the open one.
    ///
    /// Holds the per-(user, dictionary) lock across the whole
    /// check-then-create transaction, so concurrent starts can never
    /// both observe "no open session". When an open session exists it
    /// is returned as-is; the requested mode and direction are ignored.
    pub async fn start(
        &self,
        user: &DbUser,
        request: &StartTrainingRequest,
    ) -> Result<StartTrainingResponse> {
        let dictionary = self
            .db
            .get_dictionary(request.dictionary_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("dictionary {}", request.dictionary_id)))?;
        if dictionary.user_id != user.id {
            return Err(ApiError::Forbidden("dictionary belongs to another user".to_string()));
        }

        let _guard = self.locks.acquire((user.id, dictionary.id)).await;
        let (session, created) = self
            .db
            .start_session(user.id, dictionary.id, request.mode, request.direction)
            .await?;

        if created {
            tracing::info!(
                session_id = session.id,
                dictionary_id = dictionary.id,
                "started training session"
            );
        } else {
            tracing::info!(session_id = session.id, "resumed open training session");
        }

        Ok(StartTrainingResponse {
            session: session.to_session(),
            created,
        })
    }

    /// Finish a session. A second finish is a conflict, not a no-op.
    pub async fn finish(&self, user: &DbUser, session_id: i64) -> Result<TrainingSession> {
        self.owned_session(user, session_id).await?;

        match self.db.finish_session(session_id).await? {
            Some(session) => {
                tracing::info!(session_id, "finished training session");
                Ok(session.to_session())
            }
            None => Err(ApiError::Conflict(format!(
                "session {session_id} is already finished"
            ))),
        }
    }

    /// Pick the next word to ask, or report the session complete.
    pub async fn next_word(&self, user: &DbUser, session_id: i64) -> Result<NextWordResponse> {
        let session = self.owned_session(user, session_id).await?;

        let answered: HashSet<i64> = self
            .db
            .answered_word_ids(session.id)
            .await?
            .into_iter()
            .collect();
        let words: Vec<Word> = self
            .db
            .words_by_dictionary(session.dictionary_id)
            .await?
            .iter()
            .map(DbWord::to_word)
            .collect();

        let direction = session.to_session().direction;
        let mut rng = self.rng.lock().await;
        match next_prompt(&words, &answered, direction, Utc::now(), &mut *rng) {
            Selection::Done => Ok(NextWordResponse::done()),
            Selection::Prompt(prompt) => Ok(NextWordResponse::Prompt(prompt)),
        }
    }

    /// Record one answer: event append, tally bump and reschedule as a
    /// single atomic unit.
    pub async fn record_answer(
        &self,
        user: &DbUser,
        session_id: i64,
        request: &RecordAnswerRequest,
    ) -> Result<RecordAnswerResponse> {
        let session = self.owned_session(user, session_id).await?;

        self.db
            .record_answer(
                session.id,
                session.dictionary_id,
                request.word_id,
                request.correct,
                request.user_answer.as_deref(),
                &self.scheduler,
            )
            .await?;

        Ok(RecordAnswerResponse { recorded: true })
    }

    /// A user's sessions, most recent first.
    pub async fn history(&self, user: &DbUser) -> Result<Vec<TrainingSession>> {
        let sessions = self.db.session_history(user.id).await?;
        Ok(sessions.iter().map(DbSession::to_session).collect())
    }

    /// Session with its answers in creation order; word fields reflect
    /// the current rows, not snapshots from answer time.
    pub async fn session_details(
        &self,
        user: &DbUser,
        session_id: i64,
    ) -> Result<SessionDetailsResponse> {
        let session = self.owned_session(user, session_id).await?;

        let answers = self.db.answers_by_session(session.id).await?;
        let words: HashMap<i64, Word> = self
            .db
            .words_by_dictionary(session.dictionary_id)
            .await?
            .iter()
            .map(|w| (w.id, w.to_word()))
            .collect();

        let answers = answers
            .iter()
            .filter_map(|answer| {
                words.get(&answer.word_id).map(|word| AnswerDetail {
                    event: answer.to_event(),
                    word: word.clone(),
                })
            })
            .collect();

        Ok(SessionDetailsResponse {
            session: session.to_session(),
            answers,
        })
    }

    /// Words answered wrong at least once in a session, worst first.
    pub async fn weak_words(&self, user: &DbUser, session_id: i64) -> Result<Vec<WeakWord>> {
        let session = self.owned_session(user, session_id).await?;

        let events: Vec<AnswerEvent> = self
            .db
            .answers_by_session(session.id)
            .await?
            .iter()
            .map(DbAnswer::to_event)
            .collect();
        let words: Vec<Word> = self
            .db
            .words_by_dictionary(session.dictionary_id)
            .await?
            .iter()
            .map(DbWord::to_word)
            .collect();

        Ok(stats::weak_words(&words, &events, WEAK_WORDS_LIMIT))
    }

    /// Aggregate statistics across the user's whole history.
    pub async fn user_statistics(&self, user: &DbUser) -> Result<UserStatistics> {
        let total_words = self.db.count_words(user.id).await?;
        let learned = self.db.count_learned(user.id).await?;
        let due = self.db.count_due(user.id).await?;

        let events: Vec<AnswerEvent> = self
            .db
            .user_answers(user.id)
            .await?
            .iter()
            .map(DbAnswer::to_event)
            .collect();
        let correct_total = events.iter().filter(|e| e.correct).count() as i64;
        let wrong_total = events.len() as i64 - correct_total;

        let top_hard = self
            .db
            .hardest_words(user.id, TOP_HARD_LIMIT as i64)
            .await?
            .iter()
            .map(DbWeakWord::to_weak_word)
            .collect();

        Ok(UserStatistics {
            total_words,
            learned,
            due,
            correct_total,
            wrong_total,
            accuracy: stats::accuracy(correct_total, wrong_total),
            streak: stats::streak(&events),
            top_hard,
        })
    }

    /// Load a session and check it belongs to the caller.
    async fn owned_session(&self, user: &DbUser, session_id: i64) -> Result<DbSession> {
        let session = self
            .db
            .get_session(session_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("session {session_id}")))?;
        if session.user_id != user.id {
            return Err(ApiError::Forbidden("session belongs to another user".to_string()));
        }
        Ok(session)
    }
}
