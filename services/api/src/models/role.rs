//! Role model and related functionality

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::profile::Profile;

/// Access level attached to a profile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "app_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    #[default]
    User,
    Moderator,
    Admin,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::User => "user",
            AppRole::Moderator => "moderator",
            AppRole::Admin => "admin",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            AppRole::User => 0,
            AppRole::Moderator => 1,
            AppRole::Admin => 2,
        }
    }

    /// Role that wins when a profile holds several rows: admin > moderator > user.
    /// No rows means `user`.
    pub fn effective<I>(roles: I) -> AppRole
    where
        I: IntoIterator<Item = AppRole>,
    {
        roles
            .into_iter()
            .max_by_key(|role| role.precedence())
            .unwrap_or_default()
    }

    /// Row to insert after clearing a profile's roles. `user` is the
    /// implicit default and is never stored.
    pub fn stored_row(self) -> Option<AppRole> {
        match self {
            AppRole::User => None,
            role => Some(role),
        }
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User role association row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RoleAssignment {
    pub user_id: Uuid,
    pub role: AppRole,
}

/// Request body for changing a user's role
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: AppRole,
}

/// Profile with its effective role, as listed in the back-office
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRole {
    #[serde(flatten)]
    pub profile: Profile,
    pub role: AppRole,
}

/// Attach the effective role to each profile, keeping the profile order
pub fn with_effective_roles(
    profiles: Vec<Profile>,
    assignments: Vec<RoleAssignment>,
) -> Vec<UserWithRole> {
    let mut roles: HashMap<Uuid, Vec<AppRole>> = HashMap::new();
    for assignment in assignments {
        roles
            .entry(assignment.user_id)
            .or_default()
            .push(assignment.role);
    }

    profiles
        .into_iter()
        .map(|profile| {
            let role = roles
                .remove(&profile.id)
                .map(AppRole::effective)
                .unwrap_or_default();
            UserWithRole { profile, role }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(name: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: Some(format!("{}@example.com", name)),
            full_name: Some(name.to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_role_precedence() {
        assert_eq!(AppRole::effective(Vec::new()), AppRole::User);
        assert_eq!(AppRole::effective([AppRole::User]), AppRole::User);
        assert_eq!(
            AppRole::effective([AppRole::User, AppRole::Moderator]),
            AppRole::Moderator
        );
        assert_eq!(
            AppRole::effective([AppRole::Moderator, AppRole::Admin, AppRole::User]),
            AppRole::Admin
        );
    }

    #[test]
    fn test_user_role_is_never_stored() {
        assert_eq!(AppRole::User.stored_row(), None);
        assert_eq!(AppRole::Moderator.stored_row(), Some(AppRole::Moderator));
        assert_eq!(AppRole::Admin.stored_row(), Some(AppRole::Admin));
    }

    #[test]
    fn test_role_wire_names() {
        for role in [AppRole::User, AppRole::Moderator, AppRole::Admin] {
            assert_eq!(role.to_string(), role.as_str());
            assert_eq!(
                serde_json::to_value(role).unwrap(),
                serde_json::Value::String(role.to_string())
            );
        }

        let request: UpdateRoleRequest = serde_json::from_str(r#"{"role": "moderator"}"#).unwrap();
        assert_eq!(request.role, AppRole::Moderator);
        assert!(serde_json::from_str::<UpdateRoleRequest>(r#"{"role": "owner"}"#).is_err());
    }

    #[test]
    fn test_role_request_rejects_unknown_label() {
        let ok: UpdateRoleRequest = serde_json::from_str(r#"{"role": "moderator"}"#).unwrap();
        assert_eq!(ok.role, AppRole::Moderator);
        assert!(serde_json::from_str::<UpdateRoleRequest>(r#"{"role": "root"}"#).is_err());
    }

    #[test]
    fn test_with_effective_roles() {
        let alice = profile("alice");
        let bob = profile("bob");
        let carol = profile("carol");

        let assignments = vec![
            RoleAssignment {
                user_id: alice.id,
                role: AppRole::Moderator,
            },
            RoleAssignment {
                user_id: alice.id,
                role: AppRole::Admin,
            },
            RoleAssignment {
                user_id: bob.id,
                role: AppRole::Moderator,
            },
        ];

        let users = with_effective_roles(
            vec![alice.clone(), bob.clone(), carol.clone()],
            assignments,
        );
        let roles: Vec<(Uuid, AppRole)> = users.iter().map(|u| (u.profile.id, u.role)).collect();
        assert_eq!(
            roles,
            vec![
                (alice.id, AppRole::Admin),
                (bob.id, AppRole::Moderator),
                (carol.id, AppRole::User),
            ]
        );
    }
}
