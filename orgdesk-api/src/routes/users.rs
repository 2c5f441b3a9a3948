/// User account administration endpoints
///
/// All routes here are admin-only; regular accounts manage themselves
/// through `/api/auth/profile`.
///
/// # Endpoints
///
/// - `GET /api/users` - List user accounts
/// - `POST /api/users` - Create a user account with an explicit role
/// - `GET /api/users/:id` - Fetch a user account
/// - `PUT /api/users/:id` - Update a user account (role, active flag, ...)
/// - `DELETE /api/users/:id` - Delete a user account

use crate::{
    app::{AppState, AuthUser},
    error::{validation_errors, ApiError, ApiResult, ValidationErrorDetail},
    routes::{auth::UserResponse, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use orgdesk_shared::{
    auth::password,
    models::user::{UpdateUser, UserRole},
    ops::users,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create user request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 150, message = "Username must be at most 150 characters"))]
    pub username: Option<String>,

    /// Role for the new account; defaults to `employee`
    pub role: Option<UserRole>,
}

/// Update user request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(
        min = 1,
        max = 150,
        message = "Username must be between 1 and 150 characters"
    ))]
    pub username: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<UserRole>,

    /// Deactivated accounts cannot log in and their refresh tokens stop
    /// working at the next refresh
    pub is_active: Option<bool>,
}

fn require_admin(auth: AuthUser) -> ApiResult<()> {
    if !auth.role.is_admin() {
        return Err(ApiError::Forbidden(
            "Only admins may manage user accounts".to_string(),
        ));
    }
    Ok(())
}

/// Lists user accounts, newest first
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    require_admin(auth)?;

    let users = users::list(&state.db, page.limit, page.offset).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Creates a user account with an explicit role
///
/// Unlike self-registration, the caller chooses the role.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    require_admin(auth)?;
    req.validate().map_err(validation_errors)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = users::register(&state.db, req.email, req.username, req.role, password_hash).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Fetches a user account
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    require_admin(auth)?;

    let user = users::get(&state.db, id).await?;
    Ok(Json(user.into()))
}

/// Updates a user account, including role and active status
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_admin(auth)?;
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
        id,
        UpdateUser {
            email: req.email,
            username: req.username,
            role: req.role,
            password_hash,
            is_active: req.is_active,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Deletes a user account
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_admin(auth)?;

    users::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
