/// Request authentication for Axum
///
/// Reads `Authorization: Bearer <token>`, validates the JWT against the
/// configured secret and confirms the subject still exists. On success the
/// caller inserts the resulting [`AuthContext`] into request extensions so
/// handlers can take it with `Extension<AuthContext>`.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use storefront_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i32,
}

impl AuthContext {
    /// Creates an auth context for a user
    pub fn new(user_id: i32) -> Self {
        Self { user_id }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header present but not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Signature, expiry or issuer check failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token subject does not match any user
    #[error("User no longer exists")]
    UnknownUser,

    /// Database error while resolving the user
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
            _ => AuthError::InvalidToken("Invalid token".to_string()),
        }
    }
}

/// Extracts the bearer token from request headers
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored.
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if there is no Authorization header
/// - `AuthError::InvalidFormat` if the header is not a non-empty bearer token
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Authorization header is not valid ASCII".to_string()))?
        .trim();

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Bearer token is empty".to_string()));
    }

    Ok(token)
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// Any [`AuthError`]; only `DatabaseError` indicates a server-side fault.
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = validate_token(token, secret)?;

    let exists = User::exists(pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    if !exists {
        tracing::warn!(user_id = claims.sub, "Valid token for unknown user");
        return Err(AuthError::UnknownUser);
    }

    Ok(AuthContext::new(claims.sub))
}
