/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token pair
/// - `POST /api/auth/refresh` - Refresh access token
/// - `POST /api/auth/logout` - Revoke the refresh token
/// - `GET /api/auth/profile` - Current user's profile
/// - `PUT /api/auth/profile` - Update current user's profile

use crate::{
    app::{AppState, AuthUser},
    error::{validation_errors, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use orgdesk_shared::{
    auth::{password, session},
    models::user::{UpdateUser, User, UserRole},
    ops::users,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User representation returned to clients
///
/// Deliberately excludes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional username; derived from the email local-part if omitted
    #[validate(length(max = 150, message = "Username must be at most 150 characters"))]
    pub username: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The created user
    pub user: UserResponse,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The authenticated user
    pub user: UserResponse,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to revoke
    pub refresh_token: String,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(
        min = 1,
        max = 150,
        message = "Username must be between 1 and 150 characters"
    ))]
    pub username: Option<String>,

    /// New password; validated for strength like at registration
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Register a new user
///
/// New accounts get the `employee` role; role changes are an admin concern.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate().map_err(validation_errors)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = users::register(&state.db, req.email, req.username, None, password_hash).await?;

    let tokens = session::issue_token_pair(&user, state.jwt_secret())?;

    Ok(Json(RegisterResponse {
        user: user.into(),
        access_token: tokens.access,
        refresh_token: tokens.refresh,
    }))
}

/// Login endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials. Unknown email and wrong
///   password return the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(validation_errors)?;

    let (user, tokens) =
        session::authenticate(&state.db, &req.email, &req.password, state.jwt_secret()).await?;

    Ok(Json(LoginResponse {
        user: user.into(),
        access_token: tokens.access,
        refresh_token: tokens.refresh,
    }))
}

/// Token refresh endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or revoked refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token =
        session::refresh_session(&state.db, &req.refresh_token, state.jwt_secret()).await?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout endpoint
///
/// Revokes the supplied refresh token. The access token stays valid until
/// it expires.
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    session::logout(&state.db, &req.refresh_token, state.jwt_secret()).await?;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}

/// Returns the logged-in user's profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = users::get(&state.db, auth.user_id).await?;
    Ok(Json(user.into()))
}

/// Updates the logged-in user's profile
///
/// Role and active status are not editable here.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate().map_err(validation_errors)?;

    let password_hash = match req.password {
        Some(ref pw) => {
            password::validate_password_strength(pw).map_err(|e| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: e,
                }])
            })?;
            Some(password::hash_password(pw)?)
        }
        None => None,
    };

    let user = users::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            email: req.email,
            username: req.username,
            password_hash,
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(user.into()))
}
