//! The caller's own profile.

use async_trait::async_trait;
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_password_strength, FieldErrors};
use flixhub_db::models::user::{UpdateUser, UserResponse};
use flixhub_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use super::not_found;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::mediator::Request;
use crate::state::AppState;

#[derive(Debug, Validate)]
pub struct GetProfileRequest {
    pub user_id: DbId,
}

#[async_trait]
impl Request for GetProfileRequest {
    type Response = UserResponse;

    async fn handle(self, state: &AppState) -> AppResult<UserResponse> {
        let user = UserRepo::find_by_id(&state.pool, self.user_id)
            .await?
            .ok_or_else(|| not_found("User", self.user_id))?;
        let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
        Ok(user.to_response(role))
    }
}

/// Partial update of the caller's display fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(skip)]
    pub user_id: DbId,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

#[async_trait]
impl Request for UpdateProfileRequest {
    type Response = UserResponse;

    async fn handle(self, state: &AppState) -> AppResult<UserResponse> {
        let input = UpdateUser {
            first_name: self.first_name.map(|v| v.trim().to_string()),
            last_name: self.last_name.map(|v| v.trim().to_string()),
            avatar_url: self.avatar_url,
            ..Default::default()
        };
        let user = UserRepo::update(&state.pool, self.user_id, &input)
            .await?
            .ok_or_else(|| not_found("User", self.user_id))?;
        let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
        Ok(user.to_response(role))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(skip)]
    pub user_id: DbId,
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[async_trait]
impl Request for ChangePasswordRequest {
    type Response = ();

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        let Some(user) = UserRepo::find_by_id(&state.pool, self.user_id).await? else {
            return Ok(errors);
        };
        let matches = verify_password(&self.current_password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !matches {
            errors.add("current_password", "Current password is incorrect");
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<()> {
        let password_hash = hash_password(&self.new_password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        if !UserRepo::update_password(&state.pool, self.user_id, &password_hash).await? {
            return Err(not_found("User", self.user_id));
        }
        // Refresh sessions do not outlive the old password.
        SessionRepo::revoke_all_for_user(&state.pool, self.user_id).await?;

        tracing::info!(user_id = self.user_id, "Password changed");
        Ok(())
    }
}
