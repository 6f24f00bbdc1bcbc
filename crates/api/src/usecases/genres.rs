//! Genres.

use async_trait::async_trait;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_not_blank, FieldErrors};
use flixhub_db::models::genre::{Genre, SaveGenre};
use flixhub_db::repositories::GenreRepo;
use serde::Deserialize;
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::mediator::Request;
use crate::response::Page;
use crate::state::AppState;

const NAME_TAKEN: &str = "A genre with this name already exists";

#[derive(Debug, Validate)]
pub struct ListGenresRequest {
    pub search: Option<String>,
    pub window: PageWindow,
}

#[async_trait]
impl Request for ListGenresRequest {
    type Response = Page<Genre>;

    async fn handle(self, state: &AppState) -> AppResult<Page<Genre>> {
        let search = self.search.as_deref();
        let items =
            GenreRepo::list(&state.pool, search, self.window.limit, self.window.offset).await?;
        let total = GenreRepo::count(&state.pool, search).await?;
        Ok(Page::new(items, total, self.window))
    }
}

#[derive(Debug, Validate)]
pub struct GetGenreRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetGenreRequest {
    type Response = Genre;

    async fn handle(self, state: &AppState) -> AppResult<Genre> {
        GenreRepo::find_by_id(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("Genre", self.id))
    }
}

/// Create a genre, or rename one when `id` is set.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveGenreRequest {
    #[serde(skip)]
    pub id: Option<DbId>,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Must be at most 100 characters long")
    )]
    pub name: String,
}

#[async_trait]
impl Request for SaveGenreRequest {
    type Response = Genre;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if GenreRepo::name_taken(&state.pool, &self.name, self.id).await? {
            errors.add("name", NAME_TAKEN);
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<Genre> {
        let input = SaveGenre { name: self.name };
        match self.id {
            None => {
                let genre = GenreRepo::create(&state.pool, &input).await?;
                tracing::info!(genre_id = genre.id, name = %genre.name, "Genre created");
                Ok(genre)
            }
            Some(id) => GenreRepo::update(&state.pool, id, &input)
                .await?
                .ok_or_else(|| not_found("Genre", id)),
        }
    }
}

#[derive(Debug, Validate)]
pub struct DeleteGenreRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for DeleteGenreRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if !GenreRepo::delete(&state.pool, self.id).await? {
            return Err(not_found("Genre", self.id));
        }
        tracing::info!(genre_id = self.id, "Genre deleted");
        Ok(())
    }
}
