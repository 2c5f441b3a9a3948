//! # Orgdesk Shared Library
//!
//! Shared types and business logic for the Orgdesk employee-management API:
//! database models, the mutation/counter orchestration layer, and
//! authentication primitives.
//!
//! ## Module Organization
//!
//! - `models`: database records and their CRUD queries
//! - `ops`: named mutation operations (transactions, cascades, counter upkeep)
//! - `auth`: password hashing, JWT tokens, session management
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod ops;

/// Current version of the Orgdesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
