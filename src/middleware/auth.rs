use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::utils::response::Envelope;
use crate::AppState;

/// Paths reachable without a bearer token
const PUBLIC_PATHS: &[&str] = &["/pixiu/users/login", "/pixiu/users/logout", "/healthz"];

/// Authenticated user information extracted from JWT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID (subject)
    pub user_id: String,
    pub name: String,
    /// User role for RBAC
    pub role: String,
    /// Token expiration timestamp
    pub exp: u64,
    /// Token issued at timestamp
    pub iat: u64,
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub name: String,
    /// User role for RBAC
    pub role: String,
    /// Expiration time
    pub exp: u64,
    /// Issued at
    pub iat: u64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
            exp: claims.exp,
            iat: claims.iat,
        }
    }
}

/// Authentication middleware
///
/// Validates the bearer token and injects [AuthUser] into request extensions.
/// Disabled entirely when `auth.enabled` is false; login, logout and the
/// health probe are always public.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if !state.config.auth.enabled || PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let token = match extract_bearer_token(&request) {
        Some(token) => token,
        None => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    match validate_token(&token, &state.config.auth.jwt_secret) {
        Ok(claims) => {
            let auth_user = AuthUser::from(claims);
            tracing::debug!(user = %auth_user.name, "Request authenticated");
            request.extensions_mut().insert(auth_user);

            next.run(request).await
        }
        Err(e) => {
            tracing::warn!("Token validation failed: {}", e);
            unauthorized_response(&format!("Invalid token: {}", e))
        }
    }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    let auth_header = request.headers().get(AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;

    auth_str
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Validate JWT token with strict signature, algorithm, and expiration validation
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

fn unauthorized_response(message: &str) -> Response {
    Envelope::<()>::failed(StatusCode::UNAUTHORIZED, message).into_response()
}

/// Generate a new JWT token
pub fn generate_token(
    user_id: i64,
    name: &str,
    role: &str,
    secret: &str,
    expiry_seconds: u64,
) -> anyhow::Result<String> {
    use anyhow::Context;
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("Failed to get current time")?;

    let claims = Claims {
        sub: user_id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        exp: now.as_secs() + expiry_seconds,
        iat: now.as_secs(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request as HttpRequest};

    const TEST_SECRET: &str = "test-secret-key-for-testing";
    const TEST_USER_ID: i64 = 7;
    const TEST_NAME: &str = "alice";
    const TEST_ROLE: &str = "admin";

    #[test]
    fn test_generate_token_success() {
        let token = generate_token(TEST_USER_ID, TEST_NAME, TEST_ROLE, TEST_SECRET, 3600).unwrap();
        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_validate_token_success() {
        let token = generate_token(TEST_USER_ID, TEST_NAME, TEST_ROLE, TEST_SECRET, 3600).unwrap();
        let claims = validate_token(&token, TEST_SECRET).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.name, TEST_NAME);
        assert_eq!(claims.role, TEST_ROLE);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_token_wrong_secret() {
        let token = generate_token(TEST_USER_ID, TEST_NAME, TEST_ROLE, TEST_SECRET, 3600).unwrap();
        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_token_invalid_format() {
        assert!(validate_token("invalid.token.format", TEST_SECRET).is_err());
    }

    #[test]
    fn test_validate_token_expired() {
        let token = generate_token(TEST_USER_ID, TEST_NAME, TEST_ROLE, TEST_SECRET, 0).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(validate_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn test_claims_to_auth_user() {
        let claims = Claims {
            sub: "7".to_string(),
            name: TEST_NAME.to_string(),
            role: TEST_ROLE.to_string(),
            exp: 2000,
            iat: 1000,
        };

        let auth_user = AuthUser::from(claims);

        assert_eq!(auth_user.user_id, "7");
        assert_eq!(auth_user.name, TEST_NAME);
        assert_eq!(auth_user.role, TEST_ROLE);
        assert_eq!(auth_user.exp, 2000);
        assert_eq!(auth_user.iat, 1000);
    }

    #[test]
    fn test_extract_bearer_token_success() {
        let mut request = HttpRequest::builder().uri("/test").body(Body::empty()).unwrap();
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer test-token-123"));

        assert_eq!(extract_bearer_token(&request).unwrap(), "test-token-123");
    }

    #[test]
    fn test_extract_bearer_token_missing_header() {
        let request = HttpRequest::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let mut request = HttpRequest::builder().uri("/test").body(Body::empty()).unwrap();
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Basic dGVzdDp0ZXN0"));

        assert!(extract_bearer_token(&request).is_none());
    }
}
