//! Authentication middleware for JWT token validation

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{config::AuthSettings, error::ApiError, models::AppRole, state::AppState};

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub email: Option<String>,
    /// Provider role (e.g. "authenticated"), not the application role
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Expiration time
    pub exp: u64,
    /// Issued at time
    pub iat: Option<u64>,
}

/// Verifies HS256 tokens signed with the provider's shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[settings.audience.as_str()]);

        Self {
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    /// Raw bearer token, kept for sign-out
    pub token: String,
    pub expires_at: u64,
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(authorization) = bearer.ok_or(ApiError::Unauthorized)?;
    let token = authorization.token();

    let claims = state.token_verifier.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized
    })?;

    let revoked = state.sessions.is_revoked(token).await.map_err(|e| {
        error!("Failed to check token revocation: {}", e);
        ApiError::InternalServerError
    })?;
    if revoked {
        return Err(ApiError::Unauthorized);
    }

    let user = AuthUser {
        id: claims.sub,
        email: claims.email,
        token: token.to_string(),
        expires_at: claims.exp,
    };

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Admin gate; runs after [`auth_middleware`]
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = req
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.id)
        .ok_or(ApiError::Unauthorized)?;

    let is_admin = state
        .role_repository
        .has_role(user_id, AppRole::Admin)
        .await
        .map_err(|e| {
            error!("Failed to check admin role: {}", e);
            ApiError::InternalServerError
        })?;

    if !is_admin {
        warn!("User {} denied admin access", user_id);
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret".to_string(),
            audience: "authenticated".to_string(),
        }
    }

    fn token(secret: &str, aud: &str, exp_offset: i64) -> (Uuid, String) {
        let now = Utc::now().timestamp();
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id,
            email: Some("guest@example.com".to_string()),
            role: Some("authenticated".to_string()),
            aud: Some(aud.to_string()),
            exp: (now + exp_offset) as u64,
            iat: Some(now as u64),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        (id, token)
    }

    #[test]
    fn test_valid_token() {
        let verifier = TokenVerifier::new(&settings());
        let (id, token) = token("test-secret", "authenticated", 3600);

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email.as_deref(), Some("guest@example.com"));
    }

    #[test]
    fn test_wrong_secret() {
        let verifier = TokenVerifier::new(&settings());
        let (_, token) = token("other-secret", "authenticated", 3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let verifier = TokenVerifier::new(&settings());
        let (_, token) = token("test-secret", "authenticated", -3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_audience() {
        let verifier = TokenVerifier::new(&settings());
        let (_, token) = token("test-secret", "service_role", 3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token() {
        let verifier = TokenVerifier::new(&settings());
        assert!(verifier.verify("not-a-jwt").is_err());
    }
}
