//! API service routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tracing::error;

use crate::{
    error::ApiResult,
    middleware::{auth_middleware, require_admin},
    state::AppState,
};

pub mod admin;
pub mod places;
pub mod session;

/// Headroom for the JSON envelope around a base64 upload
const UPLOAD_ENVELOPE_BYTES: usize = 64 * 1024;

/// Request body limit for image uploads: base64 grows the payload by 4/3
fn upload_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(UPLOAD_ENVELOPE_BYTES)
}

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/auth/session", get(session::get_session))
        .route("/auth/logout", post(session::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let upload_limit = upload_body_limit(state.settings.storage.max_upload_bytes);

    // the last layer runs first: authentication, then the admin check
    let admin_routes = Router::new()
        .route(
            "/admin/places",
            get(admin::list_places).post(admin::create_place),
        )
        .route(
            "/admin/places/:id",
            put(admin::update_place).delete(admin::delete_place),
        )
        .route(
            "/admin/places/:id/images",
            post(admin::upload_place_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/role", put(admin::update_user_role))
        .route("/admin/stats", get(admin::get_stats))
        .route("/admin/activity", get(admin::get_activity))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/places", get(places::list_listings))
        .route("/places/featured", get(places::featured))
        .route("/places/:id", get(places::get_place))
        .merge(session_routes)
        .merge(admin_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "seastay-api"
    }))
}

/// Readiness: the database and the revocation store both answer
pub async fn readiness_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let (database, sessions) = tokio::join!(
        common::database::health_check(&state.db_pool),
        state.sessions.health_check(),
    );

    let sessions = sessions.unwrap_or_else(|e| {
        error!("Redis health check failed: {}", e);
        false
    });

    if database? && sessions {
        Ok((StatusCode::OK, Json(json!({ "status": "ready" }))))
    } else {
        Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_body_limit_covers_base64() {
        let max = 5 * 1024 * 1024;
        let limit = upload_body_limit(max);
        assert!(limit >= max * 4 / 3);
        assert!(limit < max * 2);
    }

    #[test]
    fn test_upload_body_limit_saturates() {
        assert_eq!(upload_body_limit(usize::MAX), usize::MAX);
        assert_eq!(upload_body_limit(0), UPLOAD_ENVELOPE_BYTES);
    }
}
