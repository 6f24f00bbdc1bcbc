//! Content (movie / series) model and DTOs.

use flixhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::franchise::Franchise;

/// A row from the `contents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Content {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// `movie` or `series`.
    pub content_type: String,
    pub release_year: i32,
    /// Audience score on a 0-10 scale.
    pub rating: Option<f64>,
    /// Certification label such as `PG-13`.
    pub age_rating: Option<String>,
    pub duration_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_url: Option<String>,
    pub franchise_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A genre or collection reference attached to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: DbId,
    pub name: String,
}

/// Junction row joined with the referenced name, used for batch loading.
#[derive(Debug, Clone, FromRow)]
pub struct ContentLink {
    pub content_id: DbId,
    pub id: DbId,
    pub name: String,
}

/// Content enriched with its genres and collections (list view).
#[derive(Debug, Clone, Serialize)]
pub struct ContentWithRelations {
    #[serde(flatten)]
    pub content: Content,
    pub genres: Vec<NamedRef>,
    pub collections: Vec<NamedRef>,
}

/// Full detail view for a single content item.
#[derive(Debug, Clone, Serialize)]
pub struct ContentDetail {
    #[serde(flatten)]
    pub content: Content,
    pub genres: Vec<NamedRef>,
    pub collections: Vec<NamedRef>,
    pub franchise: Option<Franchise>,
    pub episode_count: i64,
}

/// DTO for creating a content item.
#[derive(Debug, Clone)]
pub struct CreateContent {
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub release_year: i32,
    pub rating: Option<f64>,
    pub age_rating: Option<String>,
    pub duration_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_url: Option<String>,
    pub franchise_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
    pub collection_ids: Vec<DbId>,
}

/// DTO for updating a content item. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_type: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<f64>,
    pub age_rating: Option<String>,
    pub duration_minutes: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_url: Option<String>,
    pub franchise_id: Option<DbId>,
    /// If `Some`, replaces all genre associations.
    pub genre_ids: Option<Vec<DbId>>,
    /// If `Some`, replaces all collection associations.
    pub collection_ids: Option<Vec<DbId>>,
}

/// Filters for the catalog listing. All are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    pub content_type: Option<String>,
    pub genre_id: Option<DbId>,
    pub collection_id: Option<DbId>,
    pub franchise_id: Option<DbId>,
    pub release_year: Option<i32>,
}
