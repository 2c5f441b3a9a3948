/// User model and database operations
///
/// User accounts authenticate with (email, password) and carry a role the
/// API layer consults for authorization. Passwords are stored as Argon2id
/// hashes, never in plaintext.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'manager', 'employee');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     username VARCHAR(150) NOT NULL,
///     role user_role NOT NULL DEFAULT 'employee',
///     password_hash VARCHAR(255) NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Role attached to a user account
///
/// The core only stores the role; authorization policy lives in the API
/// layer, which consults these predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system access
    Admin,

    /// Manages org data
    Manager,

    /// Regular account
    Employee,
}

impl UserRole {
    /// Role as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Employee => "employee",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, UserRole::Manager)
    }

    pub fn is_employee(&self) -> bool {
        matches!(self, UserRole::Employee)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Employee
    }
}

/// Derives a username from the email local-part
///
/// Used when registration does not supply a username explicitly.
pub fn username_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, the login identifier (case-insensitive via CITEXT)
    pub email: String,

    /// Display username; derived from the email local-part if not supplied
    pub username: String,

    /// Role consulted by the API layer for authorization
    pub role: UserRole,

    /// Argon2id password hash
    pub password_hash: String,

    /// Whether the account may log in
    pub is_active: bool,

    /// When the account was created
    pub date_joined: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (unique)
    pub email: String,

    /// Display username
    pub username: String,

    /// Role (defaults to employee at the ops layer)
    pub role: UserRole,

    /// Argon2id password hash, not a plaintext password
    pub password_hash: String,
}

/// Input for updating an existing user
///
/// All fields are optional; only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: Option<UserRole>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

const USER_COLUMNS: &str =
    "id, email, username, role, password_hash, is_active, date_joined, last_login";

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the email is taken.
    pub async fn create<'e>(
        exec: impl PgExecutor<'e>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, username, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.email)
        .bind(data.username)
        .bind(data.role)
        .bind(data.password_hash)
        .fetch_one(exec)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Finds a user by email (case-insensitive)
    pub async fn find_by_email<'e>(
        exec: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(exec)
            .await
    }

    /// Updates a user; only non-None fields are written
    ///
    /// Returns the updated user, or None if the id does not resolve.
    pub async fn update<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the UPDATE dynamically from the fields that are present
        let mut query = String::from("UPDATE users SET id = id");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${bind_count}"));
        }
        if data.username.is_some() {
            bind_count += 1;
            query.push_str(&format!(", username = ${bind_count}"));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${bind_count}"));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${bind_count}"));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${bind_count}"));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {USER_COLUMNS}"));

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        q.fetch_optional(exec).await
    }

    /// Stamps last_login after a successful authentication
    pub async fn update_last_login<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists users ordered by join date (newest first), with pagination
    pub async fn list<'e>(
        exec: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY date_joined DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(exec)
        .await
    }

    /// Deletes a user account
    pub async fn delete<'e>(exec: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Manager.as_str(), "manager");
        assert_eq!(UserRole::Employee.as_str(), "employee");
    }

    #[test]
    fn test_role_predicates() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Admin.is_manager());
        assert!(!UserRole::Admin.is_employee());

        assert!(UserRole::Manager.is_manager());
        assert!(!UserRole::Manager.is_admin());

        assert!(UserRole::Employee.is_employee());
        assert!(!UserRole::Employee.is_admin());
    }

    #[test]
    fn test_default_role_is_employee() {
        assert_eq!(UserRole::default(), UserRole::Employee);
    }

    #[test]
    fn test_username_from_email() {
        assert_eq!(username_from_email("jane.doe@example.com"), "jane.doe");
        assert_eq!(username_from_email("root@localhost"), "root");
        // Degenerate input falls back to the whole string
        assert_eq!(username_from_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_update_user_default_is_noop() {
        let update = UpdateUser::default();
        assert!(update.email.is_none());
        assert!(update.username.is_none());
        assert!(update.role.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.is_active.is_none());
    }
}
