//! Token revocation using Redis

use anyhow::Result;
use chrono::Utc;
use common::cache::RedisPool;
use tracing::info;

/// Tracks signed-out tokens until they would have expired anyway
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
}

fn revoked_key(token: &str) -> String {
    format!("revoked_token:{}", token)
}

/// Seconds left until `expires_at`, never less than one
fn remaining_ttl(expires_at: u64, now: u64) -> u64 {
    expires_at.saturating_sub(now).max(1)
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }

    /// Reject `token` from now until its expiry (unix seconds)
    pub async fn revoke(&self, token: &str, expires_at: u64) -> Result<()> {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let ttl = remaining_ttl(expires_at, now);
        info!("Revoking session token for {} seconds", ttl);

        self.redis_pool
            .set(&revoked_key(token), "1", Some(ttl))
            .await
    }

    /// Check whether `token` was signed out
    pub async fn is_revoked(&self, token: &str) -> Result<bool> {
        self.redis_pool.exists(&revoked_key(token)).await
    }

    /// Check that the revocation store answers
    pub async fn health_check(&self) -> Result<bool> {
        self.redis_pool.health_check().await
    }
}
