//! Dictionary endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{
    CreateDictionaryRequest, Dictionary, DictionaryListResponse, UpdateDictionaryRequest,
};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// Load a dictionary and check it belongs to the caller.
pub(crate) async fn owned_dictionary(
    state: &AppState,
    auth: &AuthenticatedUser,
    dictionary_id: i64,
) -> Result<Dictionary> {
    let dictionary = state
        .db
        .get_dictionary(dictionary_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("dictionary {dictionary_id}")))?;
    if dictionary.user_id != auth.user.id {
        return Err(ApiError::Forbidden("dictionary belongs to another user".to_string()));
    }
    Ok(dictionary)
}

/// POST /api/dictionaries
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateDictionaryRequest>,
) -> Result<Json<Dictionary>> {
    let dictionary = state
        .db
        .create_dictionary(auth.user.id, &payload.name, payload.description.as_deref())
        .await?;

    Ok(Json(dictionary))
}

/// GET /api/dictionaries
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DictionaryListResponse>> {
    let dictionaries = state.db.list_dictionaries(auth.user.id).await?;
    Ok(Json(DictionaryListResponse { dictionaries }))
}

/// GET /api/dictionaries/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(dictionary_id): Path<i64>,
) -> Result<Json<Dictionary>> {
    let dictionary = owned_dictionary(&state, &auth, dictionary_id).await?;
    Ok(Json(dictionary))
}

/// PUT /api/dictionaries/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(dictionary_id): Path<i64>,
    Json(payload): Json<UpdateDictionaryRequest>,
) -> Result<Json<Dictionary>> {
    owned_dictionary(&state, &auth, dictionary_id).await?;

    let dictionary = state
        .db
        .update_dictionary(
            dictionary_id,
            payload.name.as_deref(),
            payload.description.as_deref(),
        )
        .await?;

    Ok(Json(dictionary))
}

/// DELETE /api/dictionaries/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(dictionary_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    owned_dictionary(&state, &auth, dictionary_id).await?;
    state.db.delete_dictionary(dictionary_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
