//! Repository for the `password_reset_tokens` table.

use flixhub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::password_reset::PasswordResetToken;
use crate::repositories::{SessionRepo, UserRepo};

const COLUMNS: &str = "id, user_id, token_hash, expires_at, used_at, created_at, updated_at";

/// Single-use password reset tokens.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Issue a new token for `user_id`.
    ///
    /// Any outstanding tokens for the user are retired in the same
    /// transaction, so only the most recent email link works.
    pub async fn issue(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<PasswordResetToken, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE password_reset_tokens SET used_at = NOW()
             WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let token = sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(token)
    }

    /// Find a token by its hash, scoped to the owning user.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_reset_tokens
             WHERE user_id = $1 AND token_hash = $2"
        );
        sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(user_id)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Consume a token and set the new password hash atomically.
    ///
    /// Also revokes every refresh session of the user. Returns `false` if the
    /// token was consumed concurrently or has expired.
    pub async fn redeem(
        pool: &PgPool,
        token_id: DbId,
        user_id: DbId,
        new_password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let consumed = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = NOW()
             WHERE id = $1 AND user_id = $2 AND used_at IS NULL AND expires_at > NOW()",
        )
        .bind(token_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if consumed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        UserRepo::update_password(&mut *tx, user_id, new_password_hash).await?;
        SessionRepo::revoke_all_for_user(&mut *tx, user_id).await?;

        tx.commit().await?;
        Ok(true)
    }
}
