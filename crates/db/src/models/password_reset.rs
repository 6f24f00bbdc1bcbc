//! Password reset token model.

use flixhub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `password_reset_tokens` table. Only the SHA-256 hash of the
/// emailed token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PasswordResetToken {
    /// A token is redeemable once, before it expires.
    pub fn is_redeemable(&self, now: Timestamp) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn token(expires_in: Duration, used: bool) -> PasswordResetToken {
        let now = Utc::now();
        PasswordResetToken {
            id: 1,
            user_id: 1,
            token_hash: "abc".to_string(),
            expires_at: now + expires_in,
            used_at: used.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn fresh_unused_token_is_redeemable() {
        assert!(token(Duration::minutes(30), false).is_redeemable(Utc::now()));
    }

    #[test]
    fn expired_or_used_token_is_not_redeemable() {
        assert!(!token(Duration::minutes(-1), false).is_redeemable(Utc::now()));
        assert!(!token(Duration::minutes(30), true).is_redeemable(Utc::now()));
    }
}
