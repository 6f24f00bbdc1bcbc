//! Handlers for `/franchises`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::types::DbId;
use flixhub_db::models::franchise::Franchise;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;
use crate::usecases::franchises::{
    CreateFranchiseRequest, DeleteFranchiseRequest, GetFranchiseRequest, ListFranchisesRequest,
    UpdateFranchiseRequest,
};

/// GET /api/v1/franchises
pub async fn list_franchises(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<Franchise>>> {
    let request = ListFranchisesRequest {
        search: params.term(),
        window: params.window(),
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/franchises/{id}
pub async fn get_franchise(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Franchise>> {
    Ok(Json(mediator::send(&state, GetFranchiseRequest { id }).await?))
}

/// POST /api/v1/franchises
pub async fn create_franchise(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateFranchiseRequest>,
) -> AppResult<(StatusCode, Json<Franchise>)> {
    let franchise = mediator::send(&state, input).await?;
    Ok((StatusCode::CREATED, Json(franchise)))
}

/// PUT /api/v1/franchises/{id}
pub async fn update_franchise(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFranchiseRequest>,
) -> AppResult<Json<Franchise>> {
    let request = UpdateFranchiseRequest { id, ..input };
    Ok(Json(mediator::send(&state, request).await?))
}

/// DELETE /api/v1/franchises/{id}
pub async fn delete_franchise(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    mediator::send(&state, DeleteFranchiseRequest { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
