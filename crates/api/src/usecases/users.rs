//! Admin user management.

use std::collections::HashMap;

use async_trait::async_trait;
use flixhub_core::error::CoreError;
use flixhub_core::pagination::PageWindow;
use flixhub_core::roles::{is_known_role, ROLE_ADMIN};
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_password_strength, validate_username, FieldErrors};
use flixhub_db::models::user::{CreateUser, UpdateUser, UserFilter, UserResponse};
use flixhub_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use flixhub_db::DbPool;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::auth::normalize_email;
use super::not_found;
use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};
use crate::mediator::Request;
use crate::response::Page;
use crate::state::AppState;

fn validate_role(value: &str) -> Result<(), ValidationError> {
    if is_known_role(value) {
        Ok(())
    } else {
        Err(ValidationError::new("role").with_message("Must be one of: admin, user".into()))
    }
}

async fn role_id(pool: &DbPool, name: &str) -> AppResult<DbId> {
    RoleRepo::find_by_name(pool, name)
        .await?
        .map(|r| r.id)
        .ok_or_else(|| AppError::InternalError(format!("Role '{name}' is not seeded")))
}

/// Uniqueness of username and email against every other user.
async fn identity_conflicts(
    pool: &DbPool,
    username: Option<&str>,
    email: Option<&str>,
    exclude_id: Option<DbId>,
) -> AppResult<FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Some(username) = username {
        if UserRepo::username_taken(pool, username.trim(), exclude_id).await? {
            errors.add("username", "Username is already taken");
        }
    }
    if let Some(email) = email {
        if UserRepo::email_taken(pool, email.trim(), exclude_id).await? {
            errors.add("email", "Email is already registered");
        }
    }
    Ok(errors)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Debug, Validate)]
pub struct ListUsersRequest {
    pub search: Option<String>,
    pub window: PageWindow,
}

#[async_trait]
impl Request for ListUsersRequest {
    type Response = Page<UserResponse>;

    async fn handle(self, state: &AppState) -> AppResult<Page<UserResponse>> {
        let filter = UserFilter {
            search: self.search,
        };
        let users = UserRepo::list(&state.pool, &filter, self.window.limit, self.window.offset)
            .await?;
        let total = UserRepo::count(&state.pool, &filter).await?;

        let roles: HashMap<DbId, String> = RoleRepo::list(&state.pool)
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let items = users
            .iter()
            .map(|u| {
                let role = roles.get(&u.role_id).cloned().unwrap_or_else(|| "unknown".into());
                u.to_response(role)
            })
            .collect();

        Ok(Page::new(items, total, self.window))
    }
}

#[derive(Debug, Validate)]
pub struct GetUserRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetUserRequest {
    type Response = UserResponse;

    async fn handle(self, state: &AppState) -> AppResult<UserResponse> {
        let user = UserRepo::find_by_id(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("User", self.id))?;
        let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
        Ok(user.to_response(role))
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

#[async_trait]
impl Request for CreateUserRequest {
    type Response = UserResponse;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        identity_conflicts(&state.pool, Some(&self.username), Some(&self.email), None).await
    }

    async fn handle(self, state: &AppState) -> AppResult<UserResponse> {
        let role_id = role_id(&state.pool, &self.role).await?;
        let password_hash = hash_password(&self.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let user = UserRepo::create(
            &state.pool,
            &CreateUser {
                username: self.username.trim().to_string(),
                email: normalize_email(&self.email),
                password_hash,
                first_name: super::trimmed(self.first_name),
                last_name: super::trimmed(self.last_name),
                role_id,
            },
        )
        .await?;

        tracing::info!(user_id = user.id, role = %self.role, "User created by admin");
        Ok(user.to_response(self.role))
    }
}

/// Admin edit of any user. Omitted fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(skip)]
    pub id: DbId,
    #[serde(skip)]
    pub caller_id: DbId,
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl Request for UpdateUserRequest {
    type Response = UserResponse;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        identity_conflicts(
            &state.pool,
            self.username.as_deref(),
            self.email.as_deref(),
            Some(self.id),
        )
        .await
    }

    async fn handle(self, state: &AppState) -> AppResult<UserResponse> {
        if self.id == self.caller_id {
            if self.is_active == Some(false) {
                return Err(AppError::Core(CoreError::Conflict(
                    "You cannot deactivate your own account".into(),
                )));
            }
            if self.role.as_deref().is_some_and(|r| r != ROLE_ADMIN) {
                return Err(AppError::Core(CoreError::Conflict(
                    "You cannot remove your own admin role".into(),
                )));
            }
        }

        let role_id = match &self.role {
            Some(name) => Some(role_id(&state.pool, name).await?),
            None => None,
        };

        let input = UpdateUser {
            username: self.username.map(|v| v.trim().to_string()),
            email: self.email.as_deref().map(normalize_email),
            first_name: self.first_name.map(|v| v.trim().to_string()),
            last_name: self.last_name.map(|v| v.trim().to_string()),
            avatar_url: self.avatar_url,
            role_id,
            is_active: self.is_active,
        };
        let user = UserRepo::update(&state.pool, self.id, &input)
            .await?
            .ok_or_else(|| not_found("User", self.id))?;

        if !user.is_active {
            SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
        }

        let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
        Ok(user.to_response(role))
    }
}

/// Deactivate a user. Accounts are never hard-deleted.
#[derive(Debug, Validate)]
pub struct DeleteUserRequest {
    pub id: DbId,
    pub caller_id: DbId,
}

#[async_trait]
impl Request for DeleteUserRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if self.id == self.caller_id {
            return Err(AppError::Core(CoreError::Conflict(
                "You cannot deactivate your own account".into(),
            )));
        }
        if !UserRepo::deactivate(&state.pool, self.id).await? {
            return Err(not_found("User", self.id));
        }
        SessionRepo::revoke_all_for_user(&state.pool, self.id).await?;
        tracing::info!(user_id = self.id, deactivated_by = self.caller_id, "User deactivated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// Create the configured admin account unless its email is already registered.
pub async fn ensure_bootstrap_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<()> {
    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::debug!(email = %admin.email, "Bootstrap admin already present");
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: normalize_email(&admin.email),
            password_hash,
            first_name: None,
            last_name: None,
            role_id: role_id(pool, ROLE_ADMIN).await?,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(())
}
