//! Application state shared across handlers

use std::sync::Arc;

use common::cache::RedisPool;
use sqlx::PgPool;

use crate::{
    config::Settings,
    middleware::TokenVerifier,
    repositories::{PlaceRepository, ProfileRepository, RoleRepository},
    session::SessionManager,
    storage::ImageStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub place_repository: PlaceRepository,
    pub profile_repository: ProfileRepository,
    pub role_repository: RoleRepository,
    pub image_store: ImageStore,
    pub sessions: SessionManager,
    pub token_verifier: TokenVerifier,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        redis_pool: RedisPool,
        image_store: ImageStore,
        settings: Settings,
    ) -> Self {
        Self {
            place_repository: PlaceRepository::new(pool.clone()),
            profile_repository: ProfileRepository::new(pool.clone()),
            role_repository: RoleRepository::new(pool.clone()),
            db_pool: pool,
            image_store,
            sessions: SessionManager::new(redis_pool),
            token_verifier: TokenVerifier::new(&settings.auth),
            settings: Arc::new(settings),
        }
    }
}
