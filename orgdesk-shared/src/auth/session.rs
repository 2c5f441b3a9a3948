//! Login sessions: authentication, token issuance, logout, refresh
//!
//! Sessions are stateless JWT pairs. Logout revokes the refresh token by
//! recording its `jti` in the denylist; access tokens simply age out of
//! their 24-hour window.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::jwt::{
    create_token, validate_refresh_token, Claims, JwtError, TokenType,
};
use crate::auth::password::verify_password;
use crate::models::revoked_token::RevokedToken;
use crate::models::user::User;
use crate::ops::OpsError;

/// An access/refresh token pair issued at login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues a fresh token pair for a user
pub fn issue_token_pair(user: &User, secret: &str) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(user.id, user.role, TokenType::Access);
    let refresh_claims = Claims::new(user.id, user.role, TokenType::Refresh);

    Ok(TokenPair {
        access: create_token(&access_claims, secret)?,
        refresh: create_token(&refresh_claims, secret)?,
    })
}

/// Authenticates a user by email and password
///
/// Stamps `last_login` and returns the user with a fresh token pair.
///
/// # Errors
///
/// Returns [`OpsError::InvalidCredentials`] when the email is unknown, the
/// account is inactive, or the password does not match. The three cases are
/// deliberately indistinguishable to the caller.
pub async fn authenticate(
    pool: &PgPool,
    email: &str,
    password: &str,
    secret: &str,
) -> Result<(User, TokenPair), OpsError> {
    let user = User::find_by_email(pool, email)
        .await?
        .ok_or(OpsError::InvalidCredentials)?;

    if !user.is_active {
        return Err(OpsError::InvalidCredentials);
    }

    if !verify_password(password, &user.password_hash)? {
        return Err(OpsError::InvalidCredentials);
    }

    User::update_last_login(pool, user.id).await?;

    let tokens = issue_token_pair(&user, secret)?;
    Ok((user, tokens))
}

/// Logs out by revoking the refresh token
///
/// The token's `jti` lands in the denylist with the token's own expiry, so
/// the entry can be pruned once the token would have died anyway. Revoking
/// an already-revoked token succeeds.
pub async fn logout(pool: &PgPool, refresh_token: &str, secret: &str) -> Result<(), OpsError> {
    let claims = validate_refresh_token(refresh_token, secret)?;

    let expires_at =
        DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
    RevokedToken::insert(pool, claims.jti, expires_at).await?;

    Ok(())
}

/// Exchanges a refresh token for a new access token
///
/// # Errors
///
/// Fails when the refresh token is invalid, expired, or revoked, or when
/// the account behind it no longer exists or is inactive.
pub async fn refresh_session(
    pool: &PgPool,
    refresh_token: &str,
    secret: &str,
) -> Result<String, OpsError> {
    let claims = validate_refresh_token(refresh_token, secret)?;

    if RevokedToken::is_revoked(pool, claims.jti).await? {
        return Err(OpsError::Jwt(JwtError::Revoked));
    }

    // Role is re-read from the account, not trusted from the old token
    let user = User::find_by_id(pool, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or(OpsError::InvalidCredentials)?;

    let access_claims = Claims::new(user.id, user.role, TokenType::Access);
    Ok(create_token(&access_claims, secret)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            username: "test".to_string(),
            role: UserRole::Employee,
            password_hash: String::new(),
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_issue_token_pair() {
        let user = test_user();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let pair = issue_token_pair(&user, secret).expect("Should issue tokens");

        let access = crate::auth::jwt::validate_access_token(&pair.access, secret).unwrap();
        assert_eq!(access.sub, user.id);
        assert_eq!(access.role, user.role);

        let refresh = validate_refresh_token(&pair.refresh, secret).unwrap();
        assert_eq!(refresh.sub, user.id);

        // Pair shares the subject but never the jti
        assert_ne!(access.jti, refresh.jti);
    }
}
