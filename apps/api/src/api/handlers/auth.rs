use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::JsonBody;
use crate::api::middleware::JwtAuth;
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::domain::user::{Email, User};
use crate::state::AppState;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user; never includes the password hash
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let email = Email::new(&req.email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;
    validate_password(&req.password).map_err(ApiError::bad_request)?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    let user = User::new(email, req.name, password_hash);
    state.users.create(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: UserResponse::from(&user),
        }),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    // A malformed address cannot belong to anyone
    let email = Email::new(&req.email).map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
        ApiError::internal_server_error(format!("Password verification failed: {}", e))
    })?;

    if !valid {
        tracing::debug!(user_id = %user.id, "Rejected login");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = create_token(user.id, &state.config.jwt_secret, state.config.jwt_expiry_hours)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Profile of the authenticated user
///
/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}
