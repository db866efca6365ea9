//! Back-office routes; every handler here sits behind the admin gate

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use base64::Engine;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    activity::{FEED_LIMIT, recent_activity},
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        PlacePayload, UpdateRoleRequest, UploadImageRequest, UploadImageResponse, UserWithRole,
        role::with_effective_roles,
    },
    state::AppState,
    stats::DashboardStats,
    validation::{image_extension, validate_content_type, validate_place},
};

/// Get all places, active or not
pub async fn list_places(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let places = state.place_repository.list_all().await.map_err(|e| {
        error!("Failed to list places: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(places))
}

/// Create a new place
pub async fn create_place(
    State(state): State<AppState>,
    Json(payload): Json<PlacePayload>,
) -> ApiResult<impl IntoResponse> {
    let new_place = validate_place(payload).map_err(ApiError::BadRequest)?;

    let place = state
        .place_repository
        .create(&new_place)
        .await
        .map_err(|e| {
            error!("Failed to create place: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Created place {} ({})", place.id, place.name);
    Ok((StatusCode::CREATED, Json(place)))
}

/// Update a place
pub async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlacePayload>,
) -> ApiResult<impl IntoResponse> {
    let changes = validate_place(payload).map_err(ApiError::BadRequest)?;

    let place = state
        .place_repository
        .update(id, &changes)
        .await
        .map_err(|e| {
            error!("Failed to update place {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?;

    info!("Updated place {}", id);
    Ok(Json(place))
}

/// Delete a place
pub async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.place_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete place {}: {}", id, e);
        ApiError::InternalServerError
    })?;

    if deleted {
        info!("Deleted place {}", id);
        Ok(Json(json!({"message": "Place deleted successfully"})))
    } else {
        Err(ApiError::NotFound("Place not found".to_string()))
    }
}

/// Upload an image for a place and add it to the gallery
pub async fn upload_place_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UploadImageRequest>,
) -> ApiResult<impl IntoResponse> {
    let extension = image_extension(&request.file_name).map_err(ApiError::BadRequest)?;
    validate_content_type(&request.content_type).map_err(ApiError::BadRequest)?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(request.file_data.trim())
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 file data: {}", e)))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("File is empty".to_string()));
    }

    let max_bytes = state.settings.storage.max_upload_bytes;
    if bytes.len() > max_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "File exceeds the {} byte limit",
            max_bytes
        )));
    }

    let exists = state
        .place_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get place {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .is_some();
    if !exists {
        return Err(ApiError::NotFound("Place not found".to_string()));
    }

    let stored = state
        .image_store
        .upload(id, &extension, request.content_type.trim(), bytes)
        .await
        .map_err(|e| {
            error!("Failed to upload image for place {}: {}", id, e);
            ApiError::InternalServerError
        })?;

    let place = state
        .place_repository
        .append_image(id, &stored.url)
        .await
        .map_err(|e| {
            error!("Failed to attach image {} to place {}: {}", stored.key, id, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?;

    info!("Attached image {} to place {}", stored.key, id);

    Ok((
        StatusCode::CREATED,
        Json(UploadImageResponse {
            key: stored.key,
            url: stored.url,
            place,
        }),
    ))
}

/// Get all profiles with their effective role
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let (profiles, assignments) = tokio::join!(
        state.profile_repository.list_all(),
        state.role_repository.list_all()
    );

    let profiles = profiles.map_err(|e| {
        error!("Failed to list profiles: {}", e);
        ApiError::InternalServerError
    })?;
    let assignments = assignments.map_err(|e| {
        error!("Failed to list role assignments: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(with_effective_roles(profiles, assignments)))
}

/// Replace a user's role
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .profile_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get profile {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    state
        .role_repository
        .set_role(id, request.role)
        .await
        .map_err(|e| {
            error!("Failed to set role for {}: {}", id, e);
            ApiError::InternalServerError
        })?;

    info!("User {} set role of {} to {}", admin.id, id, request.role);

    Ok(Json(UserWithRole {
        profile,
        role: request.role,
    }))
}

/// Dashboard numbers
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let (flags, users, cities) = tokio::join!(
        state.place_repository.activity_flags(),
        state.profile_repository.count(),
        state.place_repository.cities()
    );

    let flags = flags.map_err(|e| {
        error!("Failed to count places: {}", e);
        ApiError::InternalServerError
    })?;
    let users = users.map_err(|e| {
        error!("Failed to count users: {}", e);
        ApiError::InternalServerError
    })?;
    let cities = cities.map_err(|e| {
        error!("Failed to load cities: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(DashboardStats::compute(&flags, users, &cities)))
}

/// Recent activity feed; a failing source degrades to a warning
pub async fn get_activity(State(state): State<AppState>) -> impl IntoResponse {
    let limit = FEED_LIMIT as i64;
    let (profiles, places) = tokio::join!(
        state.profile_repository.recent(limit),
        state.place_repository.recently_updated(limit)
    );

    Json(recent_activity(profiles, places))
}
