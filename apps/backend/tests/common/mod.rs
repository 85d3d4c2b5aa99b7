//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating test data
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL).

pub mod fixtures;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use vocab_trainer_backend::db::Database;
use vocab_trainer_backend::models::DbUser;
use vocab_trainer_backend::routes;
use vocab_trainer_backend::services::training::TrainingService;
use vocab_trainer_backend::AppState;

/// Test context containing database connection and test router.
///
/// Use this to set up integration tests with a real database connection.
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// The training service uses a seeded RNG so prompt selection is
    /// deterministic across runs.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState {
            db: db.clone(),
            training: Arc::new(TrainingService::with_rng(
                db.clone(),
                StdRng::seed_from_u64(42),
            )),
        };

        let app = build_test_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return it (including the bearer token).
    pub async fn create_test_user(&self, username: &str) -> DbUser {
        self.db
            .create_user(username)
            .await
            .expect("Failed to create test user")
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: i64) {
        // Delete in order due to foreign keys
        let _ = sqlx::query(
            r#"
            DELETE FROM training_answers
            WHERE session_id IN (SELECT id FROM training_sessions WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM training_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query(
            r#"
            DELETE FROM words
            WHERE dictionary_id IN (SELECT id FROM dictionaries WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM dictionaries WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }

    /// Count open sessions for a (user, dictionary) pair.
    pub async fn count_open_sessions(&self, user_id: i64, dictionary_id: i64) -> i64 {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM training_sessions
            WHERE user_id = $1 AND dictionary_id = $2 AND finished_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(dictionary_id)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to count open sessions")
    }
}

/// Build the test router with all routes.
fn build_test_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/users/me", get(routes::users::me))
        .route("/api/dictionaries", post(routes::dictionaries::create))
        .route("/api/dictionaries", get(routes::dictionaries::list))
        .route("/api/dictionaries/:id", get(routes::dictionaries::get))
        .route("/api/dictionaries/:id", put(routes::dictionaries::update))
        .route("/api/dictionaries/:id", delete(routes::dictionaries::delete))
        .route(
            "/api/dictionaries/:id/words",
            get(routes::words::list_by_dictionary),
        )
        .route("/api/words", post(routes::words::create))
        .route("/api/words/due", get(routes::words::due))
        .route("/api/words/:id", put(routes::words::update))
        .route("/api/words/:id", delete(routes::words::delete))
        .route("/api/training/start", post(routes::training::start))
        .route("/api/training/history", get(routes::training::history))
        .route(
            "/api/training/:session_id",
            get(routes::training::session_details),
        )
        .route(
            "/api/training/:session_id/next",
            get(routes::training::next_word),
        )
        .route(
            "/api/training/:session_id/answer",
            post(routes::training::record_answer),
        )
        .route(
            "/api/training/:session_id/finish",
            post(routes::training::finish),
        )
        .route(
            "/api/training/:session_id/weak-words",
            get(routes::training::weak_words),
        )
        .route("/api/statistics", get(routes::statistics::user_statistics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .with_state(state)
}
