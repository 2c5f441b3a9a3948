//! User account operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{username_from_email, CreateUser, UpdateUser, User, UserRole};
use crate::ops::{map_write_err, OpsError};

/// Registers a new user account
///
/// The caller passes a password hash, never a plaintext password. When no
/// username is given it is derived from the email local-part.
pub async fn register(
    pool: &PgPool,
    email: String,
    username: Option<String>,
    role: Option<UserRole>,
    password_hash: String,
) -> Result<User, OpsError> {
    let username = username.unwrap_or_else(|| username_from_email(&email));

    User::create(
        pool,
        CreateUser {
            email,
            username,
            role: role.unwrap_or_default(),
            password_hash,
        },
    )
    .await
    .map_err(|e| map_write_err(e, "a user with this email already exists"))
}

/// Fetches a user by ID
pub async fn get(pool: &PgPool, id: Uuid) -> Result<User, OpsError> {
    User::find_by_id(pool, id)
        .await?
        .ok_or(OpsError::NotFound("user"))
}

/// Updates a user's profile fields
pub async fn update(pool: &PgPool, id: Uuid, data: UpdateUser) -> Result<User, OpsError> {
    User::update(pool, id, data)
        .await
        .map_err(|e| map_write_err(e, "a user with this email already exists"))?
        .ok_or(OpsError::NotFound("user"))
}

/// Lists user accounts, newest first
pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, OpsError> {
    Ok(User::list(pool, limit, offset).await?)
}

/// Deletes a user account
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), OpsError> {
    if !User::delete(pool, id).await? {
        return Err(OpsError::NotFound("user"));
    }

    Ok(())
}
