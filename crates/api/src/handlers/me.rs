//! Handlers for `/me`, the authenticated caller's own account.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use flixhub_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::usecases::me::{ChangePasswordRequest, GetProfileRequest, UpdateProfileRequest};

/// GET /api/v1/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let profile = mediator::send(&state, GetProfileRequest { user_id: auth.user_id }).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let request = UpdateProfileRequest {
        user_id: auth.user_id,
        ..input
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// POST /api/v1/me/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let request = ChangePasswordRequest {
        user_id: auth.user_id,
        ..input
    };
    mediator::send(&state, request).await?;
    Ok(StatusCode::NO_CONTENT)
}
