//! Handlers for `/collections`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::types::DbId;
use flixhub_db::models::collection::Collection;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;
use crate::usecases::collections::{
    CreateCollectionRequest, DeleteCollectionRequest, GetCollectionRequest,
    ListCollectionsRequest, UpdateCollectionRequest,
};

/// GET /api/v1/collections
pub async fn list_collections(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<Collection>>> {
    let request = ListCollectionsRequest {
        search: params.term(),
        window: params.window(),
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/collections/{id}
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Collection>> {
    Ok(Json(mediator::send(&state, GetCollectionRequest { id }).await?))
}

/// POST /api/v1/collections
pub async fn create_collection(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCollectionRequest>,
) -> AppResult<(StatusCode, Json<Collection>)> {
    let collection = mediator::send(&state, input).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

/// PUT /api/v1/collections/{id}
pub async fn update_collection(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCollectionRequest>,
) -> AppResult<Json<Collection>> {
    let request = UpdateCollectionRequest { id, ..input };
    Ok(Json(mediator::send(&state, request).await?))
}

/// DELETE /api/v1/collections/{id}
pub async fn delete_collection(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    mediator::send(&state, DeleteCollectionRequest { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
