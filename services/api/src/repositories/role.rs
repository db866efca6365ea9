//! Role repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AppRole, RoleAssignment};

/// Role repository for database operations
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every role row
    pub async fn list_all(&self) -> Result<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignment>("SELECT user_id, role FROM user_roles")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Roles held by one user
    pub async fn roles_for(&self, user_id: Uuid) -> Result<Vec<AppRole>> {
        let roles = sqlx::query_scalar::<_, AppRole>(
            "SELECT role FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    pub async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Replace a user's roles with `role`.
    ///
    /// Runs as two statements without a transaction: existing rows are
    /// deleted, then one row is inserted unless the role is `user`. If the
    /// insert fails the user is left with no rows, i.e. effective role `user`.
    pub async fn set_role(&self, user_id: Uuid, role: AppRole) -> Result<()> {
        info!("Setting role for user {}: {}", user_id, role);

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let Some(stored) = role.stored_row() else {
            return Ok(());
        };

        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(user_id)
            .bind(stored)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(
                    "Roles for user {} were cleared but inserting {} failed; user now has no role rows: {}",
                    user_id, stored, e
                );
                e
            })?;

        Ok(())
    }
}
