//! Repository for the `subscription_plans` table.

use flixhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::plan::{CreatePlan, SubscriptionPlan, UpdatePlan};

const COLUMNS: &str = "id, name, description, price_cents, currency, video_quality, \
                        max_devices, duration_days, is_active, created_at, updated_at";

/// Provides CRUD operations for subscription plans.
pub struct PlanRepo;

impl PlanRepo {
    /// Insert a new plan. Omitted currency, duration and active flag fall back
    /// to the column defaults.
    pub async fn create(pool: &PgPool, input: &CreatePlan) -> Result<SubscriptionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscription_plans
                (name, description, price_cents, currency, video_quality,
                 max_devices, duration_days, is_active)
             VALUES ($1, $2, $3, COALESCE($4, 'USD'), $5, $6, COALESCE($7, 30), COALESCE($8, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(&input.video_quality)
            .bind(input.max_devices)
            .bind(input.duration_days)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscription_plans WHERE id = $1");
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a plan other than `exclude_id` already uses `name` (case-insensitive).
    pub async fn name_taken(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM subscription_plans
                WHERE LOWER(name) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name.trim())
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    /// List plans cheapest first.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscription_plans
             WHERE ($1 OR is_active = true)
             ORDER BY price_cents ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(include_inactive)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, include_inactive: bool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM subscription_plans WHERE ($1 OR is_active = true)")
                .bind(include_inactive)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Update a plan. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlan,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE subscription_plans SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                currency = COALESCE($5, currency),
                video_quality = COALESCE($6, video_quality),
                max_devices = COALESCE($7, max_devices),
                duration_days = COALESCE($8, duration_days),
                is_active = COALESCE($9, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(&input.video_quality)
            .bind(input.max_devices)
            .bind(input.duration_days)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Whether any subscription (active or historical) references the plan.
    pub async fn has_subscriptions(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM user_subscriptions WHERE plan_id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Permanently delete a plan. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
