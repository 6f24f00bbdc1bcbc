//! Repository for the `user_subscriptions` table.

use flixhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::subscription::{
    CreateSubscription, SubscriptionDetails, SubscriptionFilter, UserSubscription,
};

const COLUMNS: &str = "id, user_id, plan_id, starts_at, ends_at, is_active, cancelled_at, \
                        created_at, updated_at";

/// Column list for the subscription ⨝ plan view (aliases `s` and `p`).
const DETAIL_COLUMNS: &str = "s.id, s.user_id, s.plan_id, p.name AS plan_name, p.video_quality, \
                               p.max_devices, p.price_cents, p.currency, s.starts_at, s.ends_at, \
                               s.is_active, s.cancelled_at, s.created_at";

const DETAIL_FROM: &str =
    "user_subscriptions s JOIN subscription_plans p ON p.id = s.plan_id";

/// Shared WHERE clause for admin listing; `$1` user id, `$2` active-only flag.
const FILTER: &str = "($1::BIGINT IS NULL OR s.user_id = $1) AND (NOT $2 OR s.is_active = true)";

/// Links users to plans.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Start a subscription, ending the user's current one first.
    ///
    /// Both statements run in one transaction so the partial unique index
    /// on active subscriptions never sees two active rows.
    pub async fn start(
        pool: &PgPool,
        input: &CreateSubscription,
    ) -> Result<UserSubscription, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE user_subscriptions
             SET is_active = false, cancelled_at = COALESCE(cancelled_at, NOW())
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(input.user_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO user_subscriptions (user_id, plan_id, starts_at, ends_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let subscription = sqlx::query_as::<_, UserSubscription>(&query)
            .bind(input.user_id)
            .bind(input.plan_id)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(subscription)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserSubscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_subscriptions WHERE id = $1");
        sqlx::query_as::<_, UserSubscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SubscriptionDetails>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE s.id = $1");
        sqlx::query_as::<_, SubscriptionDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Full subscription history of one user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SubscriptionDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE s.user_id = $1
             ORDER BY s.starts_at DESC, s.id DESC"
        );
        sqlx::query_as::<_, SubscriptionDetails>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The user's active subscription that has not yet run out.
    pub async fn find_current_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<SubscriptionDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE s.user_id = $1 AND s.is_active = true AND s.ends_at > NOW()"
        );
        sqlx::query_as::<_, SubscriptionDetails>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &SubscriptionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubscriptionDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE {FILTER}
             ORDER BY s.created_at DESC, s.id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, SubscriptionDetails>(&query)
            .bind(filter.user_id)
            .bind(filter.active_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &SubscriptionFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {DETAIL_FROM} WHERE {FILTER}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.user_id)
            .bind(filter.active_only)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Mark an active subscription cancelled. Returns `false` if the row does
    /// not exist or is already inactive.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_subscriptions SET is_active = false, cancelled_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a subscription. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_subscriptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
