//! Authentication / Authorization primitives.
//!
//! The server issues its own HS256 access tokens at login/registration and
//! validates them on incoming requests. Route protection is a middleware that
//! attaches the verified claims to request extensions; handlers receive them
//! through the [`CurrentUser`] extractor.

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Method},
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::Config,
    models::{User, UserRole},
    state::AppState,
    Error, Result,
};

const BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: Duration,
    public_paths: Arc<Vec<String>>,
}

impl AuthManager {
    pub fn new(config: &Config) -> Self {
        let secret = config.auth.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry: Duration::hours(config.auth.token_expiry_hours),
            public_paths: Arc::new(config.auth.public_paths.clone()),
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_expiry).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| Error::Unauthorized(format!("Invalid bearer token: {e}")))?;
        Ok(data.claims)
    }

    pub fn is_public_path(&self, path: &str) -> bool {
        // The auth middleware runs inside the nested `/api` router, so the
        // request path has the prefix stripped; accept either form.
        let full = format!("/api{path}");
        self.public_paths.iter().any(|p| p == path || p == &full)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

/// Extractor for the authenticated claims attached by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| Error::Unauthorized("Missing bearer token".to_string()))
    }
}

fn bearer_token(req: &axum::extract::Request) -> Result<&str> {
    let authz = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("Missing bearer token".to_string()))?;
    let authz = authz
        .to_str()
        .map_err(|_| Error::Unauthorized("Authorization header is not valid UTF-8".to_string()))?;
    authz
        .strip_prefix("Bearer ")
        .or_else(|| authz.strip_prefix("bearer "))
        .ok_or_else(|| {
            Error::Unauthorized("Authorization header must be 'Bearer <token>'".to_string())
        })
}

/// Middleware attaching `Claims` (or rejecting) on `/api` routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let path = req.uri().path().to_string();
    if state.auth.is_public_path(&path) || req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    // The landing page content is readable without a token; updates stay
    // behind authentication.
    if req.method() == Method::GET && path == "/home-page-content" {
        return next.run(req).await;
    }

    let claims = match bearer_token(&req).and_then(|token| state.auth.verify_token(token)) {
        Ok(claims) => claims,
        Err(err) => return axum::response::IntoResponse::into_response(err),
    };

    req.extensions_mut().insert(claims);
    next.run(req).await
}

/// Middleware restricting a subtree to administrators.
pub async fn admin_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    match req.extensions().get::<Claims>() {
        Some(claims) if claims.role == UserRole::Admin => next.run(req).await,
        Some(_) => axum::response::IntoResponse::into_response(Error::Forbidden(
            "Admin access required".to_string(),
        )),
        None => axum::response::IntoResponse::into_response(Error::Unauthorized(
            "Missing bearer token".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
    use chrono::NaiveDate;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec![],
                max_request_body_size: 1024,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 1,
                acquire_timeout_seconds: 1,
            },
            auth: AuthConfig {
                jwt_secret: "unit-test-secret".to_string(),
                token_expiry_hours: 1,
                public_paths: vec!["/api/auth/login".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
                file_enabled: false,
                file_directory: "logs".to_string(),
                file_prefix: "test".to_string(),
                file_rotation: "never".to_string(),
            },
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "doctor@example.com".to_string(),
            phone_number: "+8801234567891".to_string(),
            full_name: "Dr. Test".to_string(),
            role: UserRole::Doctor,
            avatar: None,
            password_hash: String::new(),
            is_verified: true,
            date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1),
            gender: None,
            address: None,
            emergency_contact: None,
            specialty: Some("ENT".to_string()),
            license_number: None,
            bio: None,
            years_of_experience: None,
            permissions: None,
            doctor_id: None,
            notification_preferences: None,
            clinic_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let manager = AuthManager::new(&test_config());
        let user = test_user();
        let token = manager.issue_token(&user).unwrap();
        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Doctor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let manager = AuthManager::new(&test_config());
        let token = manager.issue_token(&test_user()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(manager.verify_token(&tampered).is_err());
    }

    #[test]
    fn public_paths_match_with_and_without_prefix() {
        let manager = AuthManager::new(&test_config());
        assert!(manager.is_public_path("/auth/login"));
        assert!(manager.is_public_path("/api/auth/login"));
        assert!(!manager.is_public_path("/users"));
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("patient123").unwrap();
        assert!(verify_password("patient123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
