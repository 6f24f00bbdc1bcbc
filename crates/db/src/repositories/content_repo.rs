//! Repository for the `contents` table and its genre/collection junctions.

use std::collections::HashMap;

use flixhub_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::content::{
    Content, ContentDetail, ContentFilter, ContentLink, ContentWithRelations, CreateContent,
    NamedRef, UpdateContent,
};
use crate::repositories::{contains_pattern, EpisodeRepo, FranchiseRepo};

const COLUMNS: &str = "id, title, description, content_type, release_year, rating, age_rating, \
                        duration_minutes, poster_url, backdrop_url, trailer_url, video_url, \
                        franchise_id, created_at, updated_at";

/// Catalog filter over alias `c`; parameters `$1`..`$6`, `$1` being a
/// [`contains_pattern`].
const FILTER: &str = "($1::TEXT IS NULL OR c.title ILIKE $1 ESCAPE '\\')
      AND ($2::TEXT IS NULL OR c.content_type = $2)
      AND ($3::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM content_genres cg WHERE cg.content_id = c.id AND cg.genre_id = $3))
      AND ($4::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM content_collections cc
            WHERE cc.content_id = c.id AND cc.collection_id = $4))
      AND ($5::BIGINT IS NULL OR c.franchise_id = $5)
      AND ($6::INTEGER IS NULL OR c.release_year = $6)";

/// Which many-to-many relation a helper operates on.
#[derive(Debug, Clone, Copy)]
enum Link {
    Genres,
    Collections,
}

impl Link {
    /// `(junction table, foreign key column, referenced table)`.
    fn tables(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Link::Genres => ("content_genres", "genre_id", "genres"),
            Link::Collections => ("content_collections", "collection_id", "collections"),
        }
    }
}

/// Provides CRUD operations for catalog content.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert a content item together with its genre and collection links.
    pub async fn create(pool: &PgPool, input: &CreateContent) -> Result<Content, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO contents
                (title, description, content_type, release_year, rating, age_rating,
                 duration_minutes, poster_url, backdrop_url, trailer_url, video_url, franchise_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let content = sqlx::query_as::<_, Content>(&query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(&input.content_type)
            .bind(input.release_year)
            .bind(input.rating)
            .bind(&input.age_rating)
            .bind(input.duration_minutes)
            .bind(&input.poster_url)
            .bind(&input.backdrop_url)
            .bind(&input.trailer_url)
            .bind(&input.video_url)
            .bind(input.franchise_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::replace_links(&mut tx, Link::Genres, content.id, &input.genre_ids).await?;
        Self::replace_links(&mut tx, Link::Collections, content.id, &input.collection_ids).await?;

        tx.commit().await?;
        Ok(content)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Content>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contents WHERE id = $1");
        sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a content item with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM contents WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Load a content item with genres, collections, franchise and episode count.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContentDetail>, sqlx::Error> {
        let Some(content) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let genres = Self::links_for(pool, Link::Genres, id).await?;
        let collections = Self::links_for(pool, Link::Collections, id).await?;
        let franchise = match content.franchise_id {
            Some(franchise_id) => FranchiseRepo::find_by_id(pool, franchise_id).await?,
            None => None,
        };
        let episode_count = EpisodeRepo::count_by_content(pool, id).await?;

        Ok(Some(ContentDetail {
            content,
            genres,
            collections,
            franchise,
            episode_count,
        }))
    }

    /// List content newest first, each with its genre and collection names.
    pub async fn list(
        pool: &PgPool,
        filter: &ContentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentWithRelations>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contents c
             WHERE {FILTER}
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT $7 OFFSET $8"
        );
        let contents = sqlx::query_as::<_, Content>(&query)
            .bind(contains_pattern(filter.search.as_deref()))
            .bind(&filter.content_type)
            .bind(filter.genre_id)
            .bind(filter.collection_id)
            .bind(filter.franchise_id)
            .bind(filter.release_year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = contents.iter().map(|c| c.id).collect();
        let mut genres = Self::links_by_content(pool, Link::Genres, &ids).await?;
        let mut collections = Self::links_by_content(pool, Link::Collections, &ids).await?;

        Ok(contents
            .into_iter()
            .map(|content| ContentWithRelations {
                genres: genres.remove(&content.id).unwrap_or_default(),
                collections: collections.remove(&content.id).unwrap_or_default(),
                content,
            })
            .collect())
    }

    pub async fn count(pool: &PgPool, filter: &ContentFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM contents c WHERE {FILTER}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(contains_pattern(filter.search.as_deref()))
            .bind(&filter.content_type)
            .bind(filter.genre_id)
            .bind(filter.collection_id)
            .bind(filter.franchise_id)
            .bind(filter.release_year)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Update a content item. Only non-`None` fields are applied.
    ///
    /// `genre_ids` / `collection_ids` replace the whole set when `Some`.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContent,
    ) -> Result<Option<Content>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE contents SET
                title = COALESCE(TRIM($2), title),
                description = COALESCE($3, description),
                content_type = COALESCE($4, content_type),
                release_year = COALESCE($5, release_year),
                rating = COALESCE($6, rating),
                age_rating = COALESCE($7, age_rating),
                duration_minutes = COALESCE($8, duration_minutes),
                poster_url = COALESCE($9, poster_url),
                backdrop_url = COALESCE($10, backdrop_url),
                trailer_url = COALESCE($11, trailer_url),
                video_url = COALESCE($12, video_url),
                franchise_id = COALESCE($13, franchise_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let content = sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content_type)
            .bind(input.release_year)
            .bind(input.rating)
            .bind(&input.age_rating)
            .bind(input.duration_minutes)
            .bind(&input.poster_url)
            .bind(&input.backdrop_url)
            .bind(&input.trailer_url)
            .bind(&input.video_url)
            .bind(input.franchise_id)
            .fetch_optional(&mut *tx)
            .await?;

        if content.is_some() {
            if let Some(genre_ids) = &input.genre_ids {
                Self::replace_links(&mut tx, Link::Genres, id, genre_ids).await?;
            }
            if let Some(collection_ids) = &input.collection_ids {
                Self::replace_links(&mut tx, Link::Collections, id, collection_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(content)
    }

    /// Delete a content item; episodes and junction rows cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Junction helpers
    // -----------------------------------------------------------------------

    async fn links_for(
        pool: &PgPool,
        link: Link,
        content_id: DbId,
    ) -> Result<Vec<NamedRef>, sqlx::Error> {
        let mut grouped = Self::links_by_content(pool, link, &[content_id]).await?;
        Ok(grouped.remove(&content_id).unwrap_or_default())
    }

    /// Batch-load linked names for many content items in one query.
    async fn links_by_content(
        pool: &PgPool,
        link: Link,
        content_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<NamedRef>>, sqlx::Error> {
        let mut grouped: HashMap<DbId, Vec<NamedRef>> = HashMap::new();
        if content_ids.is_empty() {
            return Ok(grouped);
        }

        let (junction, fk, target) = link.tables();
        let query = format!(
            "SELECT j.content_id, t.id, t.name
             FROM {junction} j
             JOIN {target} t ON t.id = j.{fk}
             WHERE j.content_id = ANY($1)
             ORDER BY t.name ASC"
        );
        let rows = sqlx::query_as::<_, ContentLink>(&query)
            .bind(content_ids)
            .fetch_all(pool)
            .await?;

        for row in rows {
            grouped.entry(row.content_id).or_default().push(NamedRef {
                id: row.id,
                name: row.name,
            });
        }
        Ok(grouped)
    }

    /// Replace one relation's links within an existing transaction.
    /// Duplicate ids in `ids` collapse to a single link.
    async fn replace_links(
        tx: &mut Transaction<'_, Postgres>,
        link: Link,
        content_id: DbId,
        ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let (junction, fk, _) = link.tables();

        sqlx::query(&format!("DELETE FROM {junction} WHERE content_id = $1"))
            .bind(content_id)
            .execute(&mut **tx)
            .await?;

        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query(&format!(
            "INSERT INTO {junction} (content_id, {fk})
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING"
        ))
        .bind(content_id)
        .bind(ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
