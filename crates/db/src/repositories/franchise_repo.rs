//! Repository for the `franchises` table.

use flixhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::franchise::{CreateFranchise, Franchise, UpdateFranchise};
use crate::repositories::contains_pattern;

const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Shared WHERE clause for listing; `$1` is an optional [`contains_pattern`].
const SEARCH: &str = "($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\\')";

pub struct FranchiseRepo;

impl FranchiseRepo {
    pub async fn create(pool: &PgPool, input: &CreateFranchise) -> Result<Franchise, sqlx::Error> {
        let query = format!(
            "INSERT INTO franchises (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Franchise>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Franchise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM franchises WHERE id = $1");
        sqlx::query_as::<_, Franchise>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether another row already uses `name` (case-insensitive).
    pub async fn name_taken(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM franchises
                WHERE LOWER(name) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name.trim())
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Franchise>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM franchises
             WHERE {SEARCH}
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Franchise>(&query)
            .bind(contains_pattern(search))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM franchises WHERE {SEARCH}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(contains_pattern(search))
            .fetch_one(pool).await?;
        Ok(count)
    }

    /// Whether a franchise with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM franchises WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Update a franchise. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFranchise,
    ) -> Result<Option<Franchise>, sqlx::Error> {
        let query = format!(
            "UPDATE franchises SET
                name = COALESCE(TRIM($2), name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Franchise>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a franchise; content references are set to null.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM franchises WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
