//! Franchises: named groupings of related titles (a film series, a universe).

use async_trait::async_trait;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_not_blank, FieldErrors};
use flixhub_db::models::franchise::{CreateFranchise, Franchise, UpdateFranchise};
use flixhub_db::repositories::FranchiseRepo;
use serde::Deserialize;
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::mediator::Request;
use crate::response::Page;
use crate::state::AppState;

const NAME_TAKEN: &str = "A franchise with this name already exists";

#[derive(Debug, Validate)]
pub struct ListFranchisesRequest {
    pub search: Option<String>,
    pub window: PageWindow,
}

#[async_trait]
impl Request for ListFranchisesRequest {
    type Response = Page<Franchise>;

    async fn handle(self, state: &AppState) -> AppResult<Page<Franchise>> {
        let search = self.search.as_deref();
        let items =
            FranchiseRepo::list(&state.pool, search, self.window.limit, self.window.offset)
                .await?;
        let total = FranchiseRepo::count(&state.pool, search).await?;
        Ok(Page::new(items, total, self.window))
    }
}

#[derive(Debug, Validate)]
pub struct GetFranchiseRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetFranchiseRequest {
    type Response = Franchise;

    async fn handle(self, state: &AppState) -> AppResult<Franchise> {
        FranchiseRepo::find_by_id(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("Franchise", self.id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFranchiseRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Must be at most 100 characters long")
    )]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[async_trait]
impl Request for CreateFranchiseRequest {
    type Response = Franchise;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if FranchiseRepo::name_taken(&state.pool, &self.name, None).await? {
            errors.add("name", NAME_TAKEN);
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<Franchise> {
        let franchise = FranchiseRepo::create(
            &state.pool,
            &CreateFranchise {
                name: self.name,
                description: self.description,
            },
        )
        .await?;
        tracing::info!(franchise_id = franchise.id, name = %franchise.name, "Franchise created");
        Ok(franchise)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFranchiseRequest {
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
impl Request for UpdateFranchiseRequest {
    type Response = Franchise;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            if FranchiseRepo::name_taken(&state.pool, name, Some(self.id)).await? {
                errors.add("name", NAME_TAKEN);
            }
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<Franchise> {
        let input = UpdateFranchise {
            name: self.name,
            description: self.description,
        };
        FranchiseRepo::update(&state.pool, self.id, &input)
            .await?
            .ok_or_else(|| not_found("Franchise", self.id))
    }
}

/// Delete a franchise; its titles stay in the catalog unattached.
#[derive(Debug, Validate)]
pub struct DeleteFranchiseRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for DeleteFranchiseRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if !FranchiseRepo::delete(&state.pool, self.id).await? {
            return Err(not_found("Franchise", self.id));
        }
        tracing::info!(franchise_id = self.id, "Franchise deleted");
        Ok(())
    }
}
