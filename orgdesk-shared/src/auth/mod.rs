//! Authentication building blocks
//!
//! - [`password`] hashes and verifies credentials with Argon2id
//! - [`jwt`] signs and validates HS256 token pairs
//! - [`session`] ties the two to user accounts: login, logout, refresh

pub mod jwt;
pub mod password;
pub mod session;
