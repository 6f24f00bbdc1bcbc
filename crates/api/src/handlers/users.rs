//! Admin handlers for `/admin/users`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::types::DbId;
use flixhub_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;
use crate::usecases::users::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, UpdateUserRequest,
};

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let request = ListUsersRequest {
        search: params.term(),
        window: params.window(),
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(mediator::send(&state, GetUserRequest { id }).await?))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let created = mediator::send(&state, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let request = UpdateUserRequest {
        id,
        caller_id: admin.user_id,
        ..input
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivates the account and revokes its sessions.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let request = DeleteUserRequest {
        id,
        caller_id: admin.user_id,
    };
    mediator::send(&state, request).await?;
    Ok(StatusCode::NO_CONTENT)
}
