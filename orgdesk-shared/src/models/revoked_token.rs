//! Revoked token denylist
//!
//! Logout revokes a refresh token by recording its `jti` claim here. Token
//! validation consults the denylist before trusting a refresh token. Rows
//! whose `expires_at` has passed carry no information (the token would be
//! rejected on expiry anyway) and can be pruned.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

/// A revoked token entry, keyed by the token's `jti` claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RevokedToken {
    pub jti: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Records a token as revoked
    ///
    /// Revoking the same token twice is not an error.
    pub async fn insert<'e>(
        exec: impl PgExecutor<'e>,
        jti: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(expires_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Checks whether a token has been revoked
    pub async fn is_revoked<'e>(
        exec: impl PgExecutor<'e>,
        jti: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT jti FROM revoked_tokens WHERE jti = $1")
                .bind(jti)
                .fetch_optional(exec)
                .await?;

        Ok(row.is_some())
    }

    /// Deletes entries whose token has expired, returning the rows removed
    pub async fn prune_expired<'e>(exec: impl PgExecutor<'e>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }
}
