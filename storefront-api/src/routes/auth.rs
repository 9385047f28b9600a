/// Registration and login
///
/// # Endpoints
///
/// - `POST /register` - Create an account
/// - `POST /login` - Exchange credentials for an access token
///
/// Emails are trimmed and lowercased before they are stored or looked up.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::ApiJson,
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use storefront_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "Invalid email format")
    )]
    pub email: Option<String>,

    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Email is required"))]
    pub email: Option<String>,

    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// HS256 JWT for the `Authorization: Bearer` header
    pub access_token: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Runs Argon2 off the async runtime
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, password::PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("Password task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Register a new user
///
/// ```text
/// POST /register
/// { "email": "budi@example.com", "password": "rahasia" }
/// ```
///
/// Returns `201 {"message": "successfully registered"}`.
///
/// # Errors
///
/// - `400 Bad Request`: missing field, invalid email, email already registered
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let (Some(email), Some(plain)) = (req.email, req.password) else {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    };

    password::validate_password(&plain).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let email = normalize_email(&email);

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = blocking(move || password::hash_password(&plain)).await?;

    // A concurrent registration can still win the race; the unique
    // constraint error maps to the same 400.
    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("successfully registered")),
    ))
}

/// Log in with email and password
///
/// ```text
/// POST /login
/// { "email": "budi@example.com", "password": "rahasia" }
/// ```
///
/// Returns `200 {"access_token": "eyJ..."}`.
///
/// # Errors
///
/// - `400 Bad Request`: email or password missing
/// - `401 Unauthorized`: unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let (Some(email), Some(plain)) = (req.email, req.password) else {
        return Err(ApiError::BadRequest("Email and password are required".to_string()));
    };

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let Some(user) = User::find_by_email(&state.db, &normalize_email(&email)).await? else {
        tracing::debug!("Login attempt for unknown email");
        return Err(invalid());
    };

    let hash = user.password_hash.clone();
    let valid = blocking(move || password::verify_password(&plain, &hash)).await?;

    if !valid {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    let access_token = jwt::issue_access_token(user.id, state.jwt_secret(), state.config.jwt.ttl())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse { access_token }))
}
