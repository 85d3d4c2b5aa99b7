pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use crate::services::training::TrainingService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub training: Arc<TrainingService>,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let db = Arc::new(db);
    let state = AppState {
        db: db.clone(),
        training: Arc::new(TrainingService::new(db)),
    };

    // Build router with protected routes
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        // Dictionary routes
        .route("/api/dictionaries", post(routes::dictionaries::create))
        .route("/api/dictionaries", get(routes::dictionaries::list))
        .route("/api/dictionaries/:id", get(routes::dictionaries::get))
        .route("/api/dictionaries/:id", put(routes::dictionaries::update))
        .route("/api/dictionaries/:id", delete(routes::dictionaries::delete))
        .route("/api/dictionaries/:id/words", get(routes::words::list_by_dictionary))
        // Word routes
        .route("/api/words", post(routes::words::create))
        .route("/api/words/due", get(routes::words::due))
        .route("/api/words/:id", put(routes::words::update))
        .route("/api/words/:id", delete(routes::words::delete))
        // Training routes
        .route("/api/training/start", post(routes::training::start))
        .route("/api/training/history", get(routes::training::history))
        .route("/api/training/:session_id", get(routes::training::session_details))
        .route("/api/training/:session_id/next", get(routes::training::next_word))
        .route("/api/training/:session_id/answer", post(routes::training::record_answer))
        .route("/api/training/:session_id/finish", post(routes::training::finish))
        .route("/api/training/:session_id/weak-words", get(routes::training::weak_words))
        // Statistics routes
        .route("/api/statistics", get(routes::statistics::user_statistics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    // Build full router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
