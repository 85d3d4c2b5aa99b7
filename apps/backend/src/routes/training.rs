//! Training endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::{
    HistoryResponse, NextWordResponse, RecordAnswerRequest, RecordAnswerResponse,
    SessionDetailsResponse, StartTrainingRequest, StartTrainingResponse, TrainingSession,
    WeakWordsResponse,
};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/training/start
///
/// Idempotent: when an open session already exists for the dictionary
/// it is returned unchanged and the requested mode/direction are
/// ignored.
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<StartTrainingRequest>,
) -> Result<Json<StartTrainingResponse>> {
    let response = state.training.start(&auth.user, &payload).await?;
    Ok(Json(response))
}

/// GET /api/training/:session_id/next
pub async fn next_word(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
) -> Result<Json<NextWordResponse>> {
    let response = state.training.next_word(&auth.user, session_id).await?;
    Ok(Json(response))
}

/// POST /api/training/:session_id/answer
pub async fn record_answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
    Json(payload): Json<RecordAnswerRequest>,
) -> Result<Json<RecordAnswerResponse>> {
    let response = state
        .training
        .record_answer(&auth.user, session_id, &payload)
        .await?;
    Ok(Json(response))
}

/// POST /api/training/:session_id/finish
pub async fn finish(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
) -> Result<Json<TrainingSession>> {
    let session = state.training.finish(&auth.user, session_id).await?;
    Ok(Json(session))
}

/// GET /api/training/history
pub async fn history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<HistoryResponse>> {
    let sessions = state.training.history(&auth.user).await?;
    Ok(Json(HistoryResponse { sessions }))
}

/// GET /api/training/:session_id
pub async fn session_details(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionDetailsResponse>> {
    let response = state
        .training
        .session_details(&auth.user, session_id)
        .await?;
    Ok(Json(response))
}

/// GET /api/training/:session_id/weak-words
pub async fn weak_words(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
) -> Result<Json<WeakWordsResponse>> {
    let weak_words = state.training.weak_words(&auth.user, session_id).await?;
    Ok(Json(WeakWordsResponse { weak_words }))
}
