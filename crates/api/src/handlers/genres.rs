//! Handlers for `/genres`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::types::DbId;
use flixhub_db::models::genre::Genre;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;
use crate::usecases::genres::{
    DeleteGenreRequest, GetGenreRequest, ListGenresRequest, SaveGenreRequest,
};

/// GET /api/v1/genres
pub async fn list_genres(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<Genre>>> {
    let request = ListGenresRequest {
        search: params.term(),
        window: params.window(),
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/genres/{id}
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Genre>> {
    Ok(Json(mediator::send(&state, GetGenreRequest { id }).await?))
}

/// POST /api/v1/genres
pub async fn create_genre(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SaveGenreRequest>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let request = SaveGenreRequest { id: None, ..input };
    let genre = mediator::send(&state, request).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// PUT /api/v1/genres/{id}
pub async fn update_genre(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveGenreRequest>,
) -> AppResult<Json<Genre>> {
    let request = SaveGenreRequest {
        id: Some(id),
        ..input
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// DELETE /api/v1/genres/{id}
pub async fn delete_genre(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    mediator::send(&state, DeleteGenreRequest { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
