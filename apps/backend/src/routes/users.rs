//! User registration and profile endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{RegisterRequest, RegisterResponse, UserResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/users/register
/// Creates a new user and returns the bearer token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let user = state.db.create_user(&payload.username).await?;

    tracing::info!(user_id = user.id, "registered new user");

    Ok(Json(RegisterResponse {
        user_id: user.id,
        token: user.token,
    }))
}

/// GET /api/users/me
/// Returns the authenticated user's profile
pub async fn me(Extension(auth): Extension<AuthenticatedUser>) -> Result<Json<UserResponse>> {
    Ok(Json(UserResponse {
        id: auth.user.id,
        username: auth.user.username,
        created_at: auth.user.created_at,
    }))
}
