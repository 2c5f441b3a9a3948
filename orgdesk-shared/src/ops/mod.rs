//! Domain operations
//!
//! This layer owns the business rules the models deliberately do not:
//! transaction boundaries, explicit dependency-ordered cascades, the
//! onboarding state machine, and denormalized counter maintenance. HTTP
//! handlers call into this module and translate [`OpsError`] into wire
//! responses.

pub mod companies;
pub mod counters;
pub mod departments;
pub mod employees;
pub mod users;

use thiserror::Error;

/// Errors produced by domain operations
#[derive(Debug, Error)]
pub enum OpsError {
    /// The named entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A data rule was violated (uniqueness, referential integrity, non-empty checks)
    #[error("{0}")]
    ConstraintViolation(String),

    /// The requested onboarding transition is not in the allowed graph
    #[error("invalid status transition from '{from}' to '{to}'")]
    InvalidTransition {
        from: crate::models::employee::EmployeeStatus,
        to: crate::models::employee::EmployeeStatus,
    },

    /// An employee cannot be hired without a hire date
    #[error("a hire date is required when status is 'hired'")]
    MissingHireDate,

    /// Login failed; deliberately does not say whether the email exists
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token creation or validation failed
    #[error(transparent)]
    Jwt(#[from] crate::auth::jwt::JwtError),

    /// Password hashing or verification failed
    #[error(transparent)]
    Password(#[from] crate::auth::password::PasswordError),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Maps a write error onto the domain taxonomy
///
/// Constraint violations (unique, foreign key, check) become
/// [`OpsError::ConstraintViolation`] with the given message; everything else
/// passes through as a database error.
pub(crate) fn map_write_err(err: sqlx::Error, message: &str) -> OpsError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation()
        {
            return OpsError::ConstraintViolation(message.to_string());
        }
    }

    OpsError::Database(err)
}
