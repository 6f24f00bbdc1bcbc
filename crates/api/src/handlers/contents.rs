//! Handlers for `/contents`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_db::models::content::{ContentDetail, ContentFilter, ContentWithRelations};
use flixhub_db::models::episode::Episode;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{non_blank, ContentListParams};
use crate::response::Page;
use crate::state::AppState;
use crate::usecases::contents::{
    ContentEpisodesRequest, CreateContentRequest, DeleteContentRequest, GetContentRequest,
    ListContentsRequest, UpdateContentRequest,
};

/// GET /api/v1/contents
pub async fn list_contents(
    State(state): State<AppState>,
    Query(params): Query<ContentListParams>,
) -> AppResult<Json<Page<ContentWithRelations>>> {
    let request = ListContentsRequest {
        filter: ContentFilter {
            search: non_blank(params.search.as_deref()),
            content_type: non_blank(params.content_type.as_deref()),
            genre_id: params.genre_id,
            collection_id: params.collection_id,
            franchise_id: params.franchise_id,
            release_year: params.release_year,
        },
        window: PageWindow::new(params.limit, params.offset),
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/contents/{id}
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ContentDetail>> {
    Ok(Json(mediator::send(&state, GetContentRequest { id }).await?))
}

/// GET /api/v1/contents/{id}/episodes
pub async fn list_content_episodes(
    State(state): State<AppState>,
    Path(content_id): Path<DbId>,
) -> AppResult<Json<Vec<Episode>>> {
    let request = ContentEpisodesRequest { content_id };
    Ok(Json(mediator::send(&state, request).await?))
}

/// POST /api/v1/contents
pub async fn create_content(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateContentRequest>,
) -> AppResult<(StatusCode, Json<ContentDetail>)> {
    let content = mediator::send(&state, input).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

/// PUT /api/v1/contents/{id}
pub async fn update_content(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContentRequest>,
) -> AppResult<Json<ContentDetail>> {
    let request = UpdateContentRequest { id, ..input };
    Ok(Json(mediator::send(&state, request).await?))
}

/// DELETE /api/v1/contents/{id}
pub async fn delete_content(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    mediator::send(&state, DeleteContentRequest { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
