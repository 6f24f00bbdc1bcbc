//! Curated collections ("Staff picks", "Oscar winners").

use async_trait::async_trait;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_not_blank, FieldErrors};
use flixhub_db::models::collection::{Collection, CreateCollection, UpdateCollection};
use flixhub_db::repositories::CollectionRepo;
use serde::Deserialize;
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::mediator::Request;
use crate::response::Page;
use crate::state::AppState;

const NAME_TAKEN: &str = "A collection with this name already exists";

#[derive(Debug, Validate)]
pub struct ListCollectionsRequest {
    pub search: Option<String>,
    pub window: PageWindow,
}

#[async_trait]
impl Request for ListCollectionsRequest {
    type Response = Page<Collection>;

    async fn handle(self, state: &AppState) -> AppResult<Page<Collection>> {
        let search = self.search.as_deref();
        let items =
            CollectionRepo::list(&state.pool, search, self.window.limit, self.window.offset)
                .await?;
        let total = CollectionRepo::count(&state.pool, search).await?;
        Ok(Page::new(items, total, self.window))
    }
}

#[derive(Debug, Validate)]
pub struct GetCollectionRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetCollectionRequest {
    type Response = Collection;

    async fn handle(self, state: &AppState) -> AppResult<Collection> {
        CollectionRepo::find_by_id(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("Collection", self.id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCollectionRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Must be at most 100 characters long")
    )]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[async_trait]
impl Request for CreateCollectionRequest {
    type Response = Collection;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if CollectionRepo::name_taken(&state.pool, &self.name, None).await? {
            errors.add("name", NAME_TAKEN);
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<Collection> {
        let collection = CollectionRepo::create(
            &state.pool,
            &CreateCollection {
                name: self.name,
                description: self.description,
            },
        )
        .await?;
        tracing::info!(collection_id = collection.id, name = %collection.name, "Collection created");
        Ok(collection)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCollectionRequest {
    #[serde(skip)]
    pub id: DbId,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Must be at most 100 characters long")
    )]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[async_trait]
impl Request for UpdateCollectionRequest {
    type Response = Collection;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            if CollectionRepo::name_taken(&state.pool, name, Some(self.id)).await? {
                errors.add("name", NAME_TAKEN);
            }
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<Collection> {
        let input = UpdateCollection {
            name: self.name,
            description: self.description,
        };
        CollectionRepo::update(&state.pool, self.id, &input)
            .await?
            .ok_or_else(|| not_found("Collection", self.id))
    }
}

#[derive(Debug, Validate)]
pub struct DeleteCollectionRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for DeleteCollectionRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if !CollectionRepo::delete(&state.pool, self.id).await? {
            return Err(not_found("Collection", self.id));
        }
        tracing::info!(collection_id = self.id, "Collection deleted");
        Ok(())
    }
}
