//! Word endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{CreateWordRequest, DbWord, UpdateWordRequest, Word, WordListResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::routes::dictionaries::owned_dictionary;
use crate::AppState;

/// Load a word and check its dictionary belongs to the caller.
async fn owned_word(
    state: &AppState,
    auth: &AuthenticatedUser,
    word_id: i64,
) -> Result<DbWord> {
    let word = state
        .db
        .get_word(word_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("word {word_id}")))?;
    owned_dictionary(state, auth, word.dictionary_id).await?;
    Ok(word)
}

/// POST /api/words
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateWordRequest>,
) -> Result<Json<Word>> {
    owned_dictionary(&state, &auth, payload.dictionary_id).await?;

    let word = state
        .db
        .create_word(
            payload.dictionary_id,
            &payload.term,
            &payload.translation,
            payload.transcription.as_deref(),
            payload.example.as_deref(),
            payload.difficulty,
        )
        .await?;

    Ok(Json(word.to_word()))
}

/// GET /api/dictionaries/:id/words
pub async fn list_by_dictionary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(dictionary_id): Path<i64>,
) -> Result<Json<WordListResponse>> {
    owned_dictionary(&state, &auth, dictionary_id).await?;

    let words = state
        .db
        .words_by_dictionary(dictionary_id)
        .await?
        .iter()
        .map(DbWord::to_word)
        .collect();

    Ok(Json(WordListResponse { words }))
}

/// PUT /api/words/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(word_id): Path<i64>,
    Json(payload): Json<UpdateWordRequest>,
) -> Result<Json<Word>> {
    owned_word(&state, &auth, word_id).await?;

    let word = state
        .db
        .update_word(
            word_id,
            payload.term.as_deref(),
            payload.translation.as_deref(),
            payload.transcription.as_deref(),
            payload.example.as_deref(),
            payload.difficulty,
        )
        .await?;

    Ok(Json(word.to_word()))
}

/// DELETE /api/words/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(word_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    owned_word(&state, &auth, word_id).await?;
    state.db.delete_word(word_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// GET /api/words/due
/// All of the caller's words currently due for review
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<WordListResponse>> {
    let words = state
        .db
        .due_words(auth.user.id)
        .await?
        .iter()
        .map(DbWord::to_word)
        .collect();

    Ok(Json(WordListResponse { words }))
}
