//! Repository for the `episodes` table.

use flixhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::episode::{CreateEpisode, Episode, UpdateEpisode};

const COLUMNS: &str = "id, content_id, season_number, episode_number, title, description, \
                        duration_minutes, video_url, thumbnail_url, created_at, updated_at";

/// Provides CRUD operations for series episodes.
pub struct EpisodeRepo;

impl EpisodeRepo {
    pub async fn create(pool: &PgPool, input: &CreateEpisode) -> Result<Episode, sqlx::Error> {
        let query = format!(
            "INSERT INTO episodes
                (content_id, season_number, episode_number, title, description,
                 duration_minutes, video_url, thumbnail_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(input.content_id)
            .bind(input.season_number)
            .bind(input.episode_number)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(&input.video_url)
            .bind(&input.thumbnail_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM episodes WHERE id = $1");
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All episodes of a content item in viewing order.
    pub async fn list_by_content(
        pool: &PgPool,
        content_id: DbId,
    ) -> Result<Vec<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM episodes
             WHERE content_id = $1
             ORDER BY season_number ASC, episode_number ASC"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(content_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_content(pool: &PgPool, content_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM episodes WHERE content_id = $1")
            .bind(content_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Whether another episode already occupies `(season, episode)` of the content.
    pub async fn slot_taken(
        pool: &PgPool,
        content_id: DbId,
        season_number: i32,
        episode_number: i32,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM episodes
                WHERE content_id = $1 AND season_number = $2 AND episode_number = $3
                  AND ($4::BIGINT IS NULL OR id <> $4)
             )",
        )
        .bind(content_id)
        .bind(season_number)
        .bind(episode_number)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    /// Update an episode. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEpisode,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "UPDATE episodes SET
                season_number = COALESCE($2, season_number),
                episode_number = COALESCE($3, episode_number),
                title = COALESCE(TRIM($4), title),
                description = COALESCE($5, description),
                duration_minutes = COALESCE($6, duration_minutes),
                video_url = COALESCE($7, video_url),
                thumbnail_url = COALESCE($8, thumbnail_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .bind(input.season_number)
            .bind(input.episode_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(&input.video_url)
            .bind(&input.thumbnail_url)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an episode. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM episodes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
