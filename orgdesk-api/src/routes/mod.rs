/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, logout, refresh, profile)
/// - `users`: User account listing (admin only)
/// - `companies`: Company CRUD and nested listings
/// - `departments`: Department CRUD and nested listings
/// - `employees`: Employee CRUD and onboarding status transitions

pub mod auth;
pub mod companies;
pub mod departments;
pub mod employees;
pub mod health;
pub mod users;

use serde::Deserialize;

/// Common limit/offset pagination query
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,

    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}
