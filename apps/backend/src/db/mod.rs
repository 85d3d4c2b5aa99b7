//! PostgreSQL database operations

use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use trainer_core::scheduler::ReviewScheduler;
use trainer_core::stats::LEARNED_REPETITIONS;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with a generated token
    pub async fn create_user(&self, username: &str) -> Result<DbUser> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (username, token)
            VALUES ($1, $2)
            RETURNING id, username, token, created_at
            "#,
        )
        .bind(username)
        .bind(&token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("username '{username}' is already taken"))
            }
            _ => ApiError::Database(e),
        })?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, username, token, created_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // === Dictionary Repository ===

    /// Create a dictionary for a user
    pub async fn create_dictionary(
        &self,
        user_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Dictionary> {
        let dictionary = sqlx::query_as::<_, Dictionary>(
            r#"
            INSERT INTO dictionaries (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(dictionary)
    }

    /// Get dictionary by ID
    pub async fn get_dictionary(&self, dictionary_id: i64) -> Result<Option<Dictionary>> {
        let dictionary = sqlx::query_as::<_, Dictionary>(
            r#"
            SELECT id, user_id, name, description, created_at
            FROM dictionaries
            WHERE id = $1
            "#,
        )
        .bind(dictionary_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dictionary)
    }

    /// List a user's dictionaries
    pub async fn list_dictionaries(&self, user_id: i64) -> Result<Vec<Dictionary>> {
        let dictionaries = sqlx::query_as::<_, Dictionary>(
            r#"
            SELECT id, user_id, name, description, created_at
            FROM dictionaries
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dictionaries)
    }

    /// Update dictionary fields, keeping current values for omitted ones
    pub async fn update_dictionary(
        &self,
        dictionary_id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Dictionary> {
        let dictionary = sqlx::query_as::<_, Dictionary>(
            r#"
            UPDATE dictionaries
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, user_id, name, description, created_at
            "#,
        )
        .bind(dictionary_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(dictionary)
    }

    /// Delete a dictionary (cascades words, sessions and answers)
    pub async fn delete_dictionary(&self, dictionary_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM dictionaries WHERE id = $1")
            .bind(dictionary_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // === Word Repository ===

    /// Insert a new word with default review state
    pub async fn create_word(
        &self,
        dictionary_id: i64,
        term: &str,
        translation: &str,
        transcription: Option<&str>,
        example: Option<&str>,
        difficulty: Difficulty,
    ) -> Result<DbWord> {
        let word = sqlx::query_as::<_, DbWord>(
            r#"
            INSERT INTO words (dictionary_id, term, translation, transcription, example, difficulty)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, dictionary_id, term, translation, transcription, example,
                      difficulty, repetitions, easiness, interval_days,
                      last_reviewed, next_review, created_at
            "#,
        )
        .bind(dictionary_id)
        .bind(term)
        .bind(translation)
        .bind(transcription)
        .bind(example)
        .bind(difficulty.value() as i16)
        .fetch_one(&self.pool)
        .await?;

        Ok(word)
    }

    /// Get word by ID
    pub async fn get_word(&self, word_id: i64) -> Result<Option<DbWord>> {
        let word = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT id, dictionary_id, term, translation, transcription, example,
                   difficulty, repetitions, easiness, interval_days,
                   last_reviewed, next_review, created_at
            FROM words
            WHERE id = $1
            "#,
        )
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(word)
    }

    /// Get all words in a dictionary
    pub async fn words_by_dictionary(&self, dictionary_id: i64) -> Result<Vec<DbWord>> {
        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT id, dictionary_id, term, translation, transcription, example,
                   difficulty, repetitions, easiness, interval_days,
                   last_reviewed, next_review, created_at
            FROM words
            WHERE dictionary_id = $1
            ORDER BY id
            "#,
        )
        .bind(dictionary_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    /// Update word content fields, keeping current values for omitted ones
    pub async fn update_word(
        &self,
        word_id: i64,
        term: Option<&str>,
        translation: Option<&str>,
        transcription: Option<&str>,
        example: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Result<DbWord> {
        let word = sqlx::query_as::<_, DbWord>(
            r#"
            UPDATE words
            SET term = COALESCE($2, term),
                translation = COALESCE($3, translation),
                transcription = COALESCE($4, transcription),
                example = COALESCE($5, example),
                difficulty = COALESCE($6, difficulty)
            WHERE id = $1
            RETURNING id, dictionary_id, term, translation, transcription, example,
                      difficulty, repetitions, easiness, interval_days,
                      last_reviewed, next_review, created_at
            "#,
        )
        .bind(word_id)
        .bind(term)
        .bind(translation)
        .bind(transcription)
        .bind(example)
        .bind(difficulty.map(|d| d.value() as i16))
        .fetch_one(&self.pool)
        .await?;

        Ok(word)
    }

    /// Delete a word (cascades its answer events)
    pub async fn delete_word(&self, word_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM words WHERE id = $1")
            .bind(word_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All of a user's words due for review
    pub async fn due_words(&self, user_id: i64) -> Result<Vec<DbWord>> {
        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT w.id, w.dictionary_id, w.term, w.translation, w.transcription, w.example,
                   w.difficulty, w.repetitions, w.easiness, w.interval_days,
                   w.last_reviewed, w.next_review, w.created_at
            FROM words w
            JOIN dictionaries d ON d.id = w.dictionary_id
            WHERE d.user_id = $1
              AND (w.next_review IS NULL OR w.next_review <= NOW())
            ORDER BY w.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    // === Session Repository ===

    /// Get session by ID
    pub async fn get_session(&self, session_id: i64) -> Result<Option<DbSession>> {
        let session = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, user_id, dictionary_id, mode, direction, local_number,
                   correct_count, wrong_count, started_at, finished_at
            FROM training_sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Start a session, or resume the open one for this (user, dictionary).
    ///
    /// The open-session check, local-number computation and insert run in
    /// one transaction. Callers must hold the per-(user, dictionary) lock
    /// for the duration of the call so concurrent starts serialize.
    /// Returns the session and whether it was created.
    pub async fn start_session(
        &self,
        user_id: i64,
        dictionary_id: i64,
        mode: Mode,
        direction: Direction,
    ) -> Result<(DbSession, bool)> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, user_id, dictionary_id, mode, direction, local_number,
                   correct_count, wrong_count, started_at, finished_at
            FROM training_sessions
            WHERE user_id = $1 AND dictionary_id = $2 AND finished_at IS NULL
            ORDER BY started_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(dictionary_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(session) = existing {
            tx.commit().await?;
            return Ok((session, false));
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM training_sessions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        let session = sqlx::query_as::<_, DbSession>(
            r#"
            INSERT INTO training_sessions (user_id, dictionary_id, mode, direction, local_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, dictionary_id, mode, direction, local_number,
                      correct_count, wrong_count, started_at, finished_at
            "#,
        )
        .bind(user_id)
        .bind(dictionary_id)
        .bind(mode.as_str())
        .bind(direction.as_str())
        .bind(count + 1)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((session, true))
    }

    /// Close a session. Returns `None` when no open row matched, i.e. the
    /// session was already finished (or does not exist).
    pub async fn finish_session(&self, session_id: i64) -> Result<Option<DbSession>> {
        let session = sqlx::query_as::<_, DbSession>(
            r#"
            UPDATE training_sessions
            SET finished_at = NOW()
            WHERE id = $1 AND finished_at IS NULL
            RETURNING id, user_id, dictionary_id, mode, direction, local_number,
                      correct_count, wrong_count, started_at, finished_at
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// A user's sessions, most recent first
    pub async fn session_history(&self, user_id: i64) -> Result<Vec<DbSession>> {
        let sessions = sqlx::query_as::<_, DbSession>(
            r#"
            SELECT id, user_id, dictionary_id, mode, direction, local_number,
                   correct_count, wrong_count, started_at, finished_at
            FROM training_sessions
            WHERE user_id = $1
            ORDER BY local_number DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    // === Answer Repository ===

    /// Record an answer: append the event, bump the session tallies and
    /// reschedule the word, all in one transaction.
    ///
    /// `dictionary_id` is the session's dictionary; a word from any other
    /// dictionary is rejected before anything is written.
    pub async fn record_answer(
        &self,
        session_id: i64,
        dictionary_id: i64,
        word_id: i64,
        correct: bool,
        user_answer: Option<&str>,
        scheduler: &ReviewScheduler,
    ) -> Result<DbAnswer> {
        let mut tx = self.pool.begin().await?;

        let word = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT id, dictionary_id, term, translation, transcription, example,
                   difficulty, repetitions, easiness, interval_days,
                   last_reviewed, next_review, created_at
            FROM words
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(word_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("word {word_id}")))?;

        if word.dictionary_id != dictionary_id {
            return Err(ApiError::Forbidden(
                "word does not belong to the session dictionary".to_string(),
            ));
        }

        let answer = sqlx::query_as::<_, DbAnswer>(
            r#"
            INSERT INTO training_answers (session_id, word_id, correct, user_answer)
            VALUES ($1, $2, $3, $4)
            RETURNING id, session_id, word_id, correct, user_answer, created_at
            "#,
        )
        .bind(session_id)
        .bind(word_id)
        .bind(correct)
        .bind(user_answer)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE training_sessions
            SET correct_count = correct_count + $2,
                wrong_count = wrong_count + $3
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .bind(if correct { 1i64 } else { 0 })
        .bind(if correct { 0i64 } else { 1 })
        .execute(&mut *tx)
        .await?;

        let next = scheduler.update(&word.review_state(), correct, Utc::now());
        sqlx::query(
            r#"
            UPDATE words
            SET repetitions = $2,
                easiness = $3,
                interval_days = $4,
                last_reviewed = $5,
                next_review = $6
            WHERE id = $1
            "#,
        )
        .bind(word_id)
        .bind(next.repetitions as i32)
        .bind(next.easiness)
        .bind(next.interval_days)
        .bind(next.last_reviewed)
        .bind(next.next_review)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(answer)
    }

    /// All answers of a session in creation order
    pub async fn answers_by_session(&self, session_id: i64) -> Result<Vec<DbAnswer>> {
        let answers = sqlx::query_as::<_, DbAnswer>(
            r#"
            SELECT id, session_id, word_id, correct, user_answer, created_at
            FROM training_answers
            WHERE session_id = $1
            ORDER BY id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    /// IDs of words already answered in a session
    pub async fn answered_word_ids(&self, session_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT word_id
            FROM training_answers
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    // === Statistics Queries ===

    /// Total words across all of a user's dictionaries
    pub async fn count_words(&self, user_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM words w
            JOIN dictionaries d ON d.id = w.dictionary_id
            WHERE d.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Words the user has learned (repetition threshold reached)
    pub async fn count_learned(&self, user_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM words w
            JOIN dictionaries d ON d.id = w.dictionary_id
            WHERE d.user_id = $1 AND w.repetitions >= $2
            "#,
        )
        .bind(user_id)
        .bind(LEARNED_REPETITIONS as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Words of the user currently due for review
    pub async fn count_due(&self, user_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM words w
            JOIN dictionaries d ON d.id = w.dictionary_id
            WHERE d.user_id = $1
              AND (w.next_review IS NULL OR w.next_review <= NOW())
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Every answer across all of a user's sessions, in creation order
    pub async fn user_answers(&self, user_id: i64) -> Result<Vec<DbAnswer>> {
        let answers = sqlx::query_as::<_, DbAnswer>(
            r#"
            SELECT a.id, a.session_id, a.word_id, a.correct, a.user_answer, a.created_at
            FROM training_answers a
            JOIN training_sessions s ON s.id = a.session_id
            WHERE s.user_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    /// Words with the most wrong answers across the user's history
    pub async fn hardest_words(&self, user_id: i64, limit: i64) -> Result<Vec<DbWeakWord>> {
        let words = sqlx::query_as::<_, DbWeakWord>(
            r#"
            SELECT w.id, w.dictionary_id, w.term, w.translation, w.transcription, w.example,
                   w.difficulty, w.repetitions, w.easiness, w.interval_days,
                   w.last_reviewed, w.next_review, w.created_at,
                   COUNT(*) AS mistakes
            FROM training_answers a
            JOIN training_sessions s ON s.id = a.session_id
            JOIN words w ON w.id = a.word_id
            WHERE s.user_id = $1 AND a.correct = FALSE
            GROUP BY w.id
            ORDER BY mistakes DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }
}
