//! Handlers for `/episodes`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::types::DbId;
use flixhub_db::models::episode::Episode;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;
use crate::usecases::episodes::{
    CreateEpisodeRequest, DeleteEpisodeRequest, GetEpisodeRequest, UpdateEpisodeRequest,
};

/// GET /api/v1/episodes/{id}
pub async fn get_episode(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Episode>> {
    Ok(Json(mediator::send(&state, GetEpisodeRequest { id }).await?))
}

/// POST /api/v1/episodes
pub async fn create_episode(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEpisodeRequest>,
) -> AppResult<(StatusCode, Json<Episode>)> {
    let episode = mediator::send(&state, input).await?;
    Ok((StatusCode::CREATED, Json(episode)))
}

/// PUT /api/v1/episodes/{id}
pub async fn update_episode(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEpisodeRequest>,
) -> AppResult<Json<Episode>> {
    let request = UpdateEpisodeRequest { id, ..input };
    Ok(Json(mediator::send(&state, request).await?))
}

/// DELETE /api/v1/episodes/{id}
pub async fn delete_episode(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    mediator::send(&state, DeleteEpisodeRequest { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
