//! Routes for the signed-in user's session

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{AppRole, SessionResponse},
    state::AppState,
};

/// Current user, with the profile row created on first sign-in
pub async fn get_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .profile_repository
        .ensure_exists(user.id, user.email.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to load profile for {}: {}", user.id, e);
            ApiError::InternalServerError
        })?;

    let roles = state.role_repository.roles_for(user.id).await.map_err(|e| {
        error!("Failed to load roles for {}: {}", user.id, e);
        ApiError::InternalServerError
    })?;
    let role = AppRole::effective(roles);

    Ok(Json(SessionResponse {
        user_id: profile.id,
        email: profile.email,
        full_name: profile.full_name,
        role,
        is_admin: role == AppRole::Admin,
    }))
}

/// Sign out: the presented token is rejected until it expires
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    state
        .sessions
        .revoke(&user.token, user.expires_at)
        .await
        .map_err(|e| {
            error!("Failed to revoke token for {}: {}", user.id, e);
            ApiError::InternalServerError
        })?;

    info!("User {} signed out", user.id);

    Ok(Json(json!({"message": "Signed out successfully"})))
}
