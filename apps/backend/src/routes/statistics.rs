//! Statistics endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::UserStatistics;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/statistics
pub async fn user_statistics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserStatistics>> {
    let statistics = state.training.user_statistics(&auth.user).await?;
    Ok(Json(statistics))
}
