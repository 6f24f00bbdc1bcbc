//! Catalog content: movies and series.

use async_trait::async_trait;
use flixhub_core::catalog::{validate_content_type, ContentType};
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_core::validation::{check_release_year_now, validate_not_blank, FieldErrors};
use flixhub_db::models::content::{
    ContentDetail, ContentFilter, ContentWithRelations, CreateContent, UpdateContent,
};
use flixhub_db::models::episode::Episode;
use flixhub_db::repositories::{
    CollectionRepo, ContentRepo, EpisodeRepo, FranchiseRepo, GenreRepo,
};
use flixhub_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use super::{join_ids, missing_ids, not_found};
use crate::error::AppResult;
use crate::mediator::Request;
use crate::response::Page;
use crate::state::AppState;

/// Field rules plus the release-year window, which moves with the calendar.
fn field_errors<T: Validate>(input: &T, release_year: Option<i32>) -> Result<(), FieldErrors> {
    let mut errors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };
    if let Some(Err(message)) = release_year.map(check_release_year_now) {
        errors.add("release_year", message);
    }
    errors.into_result()
}

/// Every referenced genre, collection and franchise must exist.
async fn reference_errors(
    pool: &DbPool,
    genre_ids: Option<&[DbId]>,
    collection_ids: Option<&[DbId]>,
    franchise_id: Option<DbId>,
) -> AppResult<FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(ids) = genre_ids.filter(|ids| !ids.is_empty()) {
        let missing = missing_ids(ids, &GenreRepo::existing_ids(pool, ids).await?);
        if !missing.is_empty() {
            errors.add("genre_ids", format!("Unknown genre ids: {}", join_ids(&missing)));
        }
    }
    if let Some(ids) = collection_ids.filter(|ids| !ids.is_empty()) {
        let missing = missing_ids(ids, &CollectionRepo::existing_ids(pool, ids).await?);
        if !missing.is_empty() {
            errors.add(
                "collection_ids",
                format!("Unknown collection ids: {}", join_ids(&missing)),
            );
        }
    }
    if let Some(id) = franchise_id {
        if !FranchiseRepo::exists(pool, id).await? {
            errors.add("franchise_id", format!("Franchise {id} does not exist"));
        }
    }

    Ok(errors)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Debug, Validate)]
pub struct ListContentsRequest {
    pub filter: ContentFilter,
    pub window: PageWindow,
}

#[async_trait]
impl Request for ListContentsRequest {
    type Response = Page<ContentWithRelations>;

    fn validate_fields(&self) -> Result<(), FieldErrors> {
        match self.filter.content_type.as_deref().map(validate_content_type) {
            Some(Err(e)) => Err(FieldErrors::single(
                "content_type",
                e.message.map(|m| m.to_string()).unwrap_or_default(),
            )),
            _ => Ok(()),
        }
    }

    async fn handle(self, state: &AppState) -> AppResult<Page<ContentWithRelations>> {
        let items =
            ContentRepo::list(&state.pool, &self.filter, self.window.limit, self.window.offset)
                .await?;
        let total = ContentRepo::count(&state.pool, &self.filter).await?;
        Ok(Page::new(items, total, self.window))
    }
}

#[derive(Debug, Validate)]
pub struct GetContentRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetContentRequest {
    type Response = ContentDetail;

    async fn handle(self, state: &AppState) -> AppResult<ContentDetail> {
        ContentRepo::find_detail(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("Content", self.id))
    }
}

/// Episodes of one content item in viewing order.
#[derive(Debug, Validate)]
pub struct ContentEpisodesRequest {
    pub content_id: DbId,
}

#[async_trait]
impl Request for ContentEpisodesRequest {
    type Response = Vec<Episode>;

    async fn handle(self, state: &AppState) -> AppResult<Vec<Episode>> {
        if !ContentRepo::exists(&state.pool, self.content_id).await? {
            return Err(not_found("Content", self.content_id));
        }
        Ok(EpisodeRepo::list_by_content(&state.pool, self.content_id).await?)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContentRequest {
    #[validate(custom(function = "validate_not_blank"), length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_content_type"))]
    pub content_type: String,
    pub release_year: i32,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: Option<f64>,
    #[validate(length(max = 16))]
    pub age_rating: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub poster_url: Option<String>,
    #[validate(url)]
    pub backdrop_url: Option<String>,
    #[validate(url)]
    pub trailer_url: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    pub franchise_id: Option<DbId>,
    #[serde(default)]
    pub genre_ids: Vec<DbId>,
    #[serde(default)]
    pub collection_ids: Vec<DbId>,
}

#[async_trait]
impl Request for CreateContentRequest {
    type Response = ContentDetail;

    fn validate_fields(&self) -> Result<(), FieldErrors> {
        field_errors(self, Some(self.release_year))
    }

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        reference_errors(
            &state.pool,
            Some(&self.genre_ids),
            Some(&self.collection_ids),
            self.franchise_id,
        )
        .await
    }

    async fn handle(self, state: &AppState) -> AppResult<ContentDetail> {
        let input = CreateContent {
            title: self.title,
            description: self.description,
            content_type: self.content_type,
            release_year: self.release_year,
            rating: self.rating,
            age_rating: super::trimmed(self.age_rating),
            duration_minutes: self.duration_minutes,
            poster_url: self.poster_url,
            backdrop_url: self.backdrop_url,
            trailer_url: self.trailer_url,
            video_url: self.video_url,
            franchise_id: self.franchise_id,
            genre_ids: self.genre_ids,
            collection_ids: self.collection_ids,
        };
        let content = ContentRepo::create(&state.pool, &input).await?;
        tracing::info!(content_id = content.id, title = %content.title, "Content created");

        ContentRepo::find_detail(&state.pool, content.id)
            .await?
            .ok_or_else(|| not_found("Content", content.id))
    }
}

/// Partial update. `genre_ids` / `collection_ids` replace the whole set when present.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContentRequest {
    #[serde(skip)]
    pub id: DbId,
    #[validate(custom(function = "validate_not_blank"), length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_content_type"))]
    pub content_type: Option<String>,
    pub release_year: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: Option<f64>,
    #[validate(length(max = 16))]
    pub age_rating: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub poster_url: Option<String>,
    #[validate(url)]
    pub backdrop_url: Option<String>,
    #[validate(url)]
    pub trailer_url: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    pub franchise_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
    pub collection_ids: Option<Vec<DbId>>,
}

#[async_trait]
impl Request for UpdateContentRequest {
    type Response = ContentDetail;

    fn validate_fields(&self) -> Result<(), FieldErrors> {
        field_errors(self, self.release_year)
    }

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = reference_errors(
            &state.pool,
            self.genre_ids.as_deref(),
            self.collection_ids.as_deref(),
            self.franchise_id,
        )
        .await?;
        // Episodes belong to series only.
        if self.content_type.as_deref() == Some(ContentType::Movie.as_str())
            && EpisodeRepo::count_by_content(&state.pool, self.id).await? > 0
        {
            errors.add("content_type", "A series with episodes cannot become a movie");
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<ContentDetail> {
        let input = UpdateContent {
            title: self.title,
            description: self.description,
            content_type: self.content_type,
            release_year: self.release_year,
            rating: self.rating,
            age_rating: self.age_rating.map(|v| v.trim().to_string()),
            duration_minutes: self.duration_minutes,
            poster_url: self.poster_url,
            backdrop_url: self.backdrop_url,
            trailer_url: self.trailer_url,
            video_url: self.video_url,
            franchise_id: self.franchise_id,
            genre_ids: self.genre_ids,
            collection_ids: self.collection_ids,
        };
        if ContentRepo::update(&state.pool, self.id, &input).await?.is_none() {
            return Err(not_found("Content", self.id));
        }

        ContentRepo::find_detail(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("Content", self.id))
    }
}

/// Delete a content item together with its episodes and links.
#[derive(Debug, Validate)]
pub struct DeleteContentRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for DeleteContentRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if !ContentRepo::delete(&state.pool, self.id).await? {
            return Err(not_found("Content", self.id));
        }
        tracing::info!(content_id = self.id, "Content deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Datelike;

    use super::*;

    fn movie() -> CreateContentRequest {
        CreateContentRequest {
            title: "Heat".into(),
            description: Some("Crime epic".into()),
            content_type: "movie".into(),
            release_year: 1995,
            rating: Some(8.3),
            age_rating: Some("R".into()),
            duration_minutes: Some(170),
            poster_url: Some("https://cdn.example.com/heat.jpg".into()),
            backdrop_url: None,
            trailer_url: None,
            video_url: None,
            franchise_id: None,
            genre_ids: vec![1, 2],
            collection_ids: vec![],
        }
    }

    #[test]
    fn valid_movie_passes() {
        assert_matches!(movie().validate_fields(), Ok(()));
    }

    #[test]
    fn release_year_error_merges_with_derive_errors() {
        let request = CreateContentRequest {
            title: "".into(),
            release_year: 1700,
            rating: Some(11.0),
            ..movie()
        };
        let errors = request.validate_fields().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["rating", "release_year", "title"]
        );
    }

    #[test]
    fn release_year_may_be_a_few_years_ahead() {
        let next_year = chrono::Utc::now().year() + 1;
        let request = CreateContentRequest {
            release_year: next_year,
            ..movie()
        };
        assert_matches!(request.validate_fields(), Ok(()));
    }

    #[test]
    fn update_validates_only_present_fields() {
        let request = UpdateContentRequest {
            id: 1,
            title: None,
            description: None,
            content_type: Some("podcast".into()),
            release_year: None,
            rating: None,
            age_rating: None,
            duration_minutes: Some(0),
            poster_url: None,
            backdrop_url: None,
            trailer_url: None,
            video_url: None,
            franchise_id: None,
            genre_ids: Some(vec![]),
            collection_ids: None,
        };
        let errors = request.validate_fields().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["content_type", "duration_minutes"]
        );
    }

    #[test]
    fn list_rejects_unknown_content_type() {
        let request = ListContentsRequest {
            filter: ContentFilter {
                content_type: Some("documentary".into()),
                ..Default::default()
            },
            window: PageWindow::new(None, None),
        };
        assert!(request.validate_fields().unwrap_err().get("content_type").is_some());
    }
}
